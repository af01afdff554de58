//! Lattice configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Shape and seating of a game.
///
/// ```toml
/// nrow = 4
/// ncol = 5      # defaults to nrow
/// nplayer = 3   # defaults to 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Number of square rows.
    #[serde(default = "default_nrow")]
    nrow: u32,

    /// Number of square columns; `None` means square lattice.
    #[serde(default)]
    ncol: Option<u32>,

    /// Number of players.
    #[serde(default = "default_nplayer")]
    nplayer: u32,
}

fn default_nrow() -> u32 {
    6
}

fn default_nplayer() -> u32 {
    2
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            nrow: default_nrow(),
            ncol: None,
            nplayer: default_nplayer(),
        }
    }
}

impl LatticeConfig {
    /// Creates a configuration with explicit dimensions.
    pub fn new(nrow: u32, ncol: u32, nplayer: u32) -> Self {
        Self {
            nrow,
            ncol: Some(ncol),
            nplayer,
        }
    }

    /// Column count, falling back to the row count.
    pub fn ncol_or_default(&self) -> u32 {
        self.ncol.unwrap_or(self.nrow)
    }

    /// Returns a copy with any given field replaced.
    pub fn with_overrides(
        mut self,
        nrow: Option<u32>,
        ncol: Option<u32>,
        nplayer: Option<u32>,
    ) -> Self {
        if let Some(nrow) = nrow {
            self.nrow = nrow;
        }
        if ncol.is_some() {
            self.ncol = ncol;
        }
        if let Some(nplayer) = nplayer {
            self.nplayer = nplayer;
        }
        self
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(
            nrow = config.nrow,
            ncol = config.ncol_or_default(),
            nplayer = config.nplayer,
            "Config loaded"
        );
        Ok(config)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
