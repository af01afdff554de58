//! Replaying recorded games.

use crate::cli::BoardArgs;
use crate::play::tallies;
use anyhow::{Context, Result, anyhow, bail};
use dots_engine::{Edge, Lattice, Move, Orientation, PlayerId};
use std::path::Path;
use tracing::{info, instrument, warn};

/// One move from a script, with the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedMove {
    /// 1-based line number in the script.
    pub line: usize,
    /// The move itself.
    pub action: Move,
}

/// Parses `player row col h|v` lines. Blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> Result<Vec<ScriptedMove>> {
    let mut moves = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let fields: Vec<&str> = content.split_whitespace().collect();
        let [player, row, col, orientation] = fields.as_slice() else {
            bail!("line {}: expected `player row col h|v`, got `{}`", line, content);
        };
        let player = player
            .parse::<u8>()
            .ok()
            .and_then(PlayerId::new)
            .ok_or_else(|| anyhow!("line {}: bad player `{}`", line, player))?;
        let row = row
            .parse::<u32>()
            .with_context(|| format!("line {}: bad row `{}`", line, row))?;
        let col = col
            .parse::<u32>()
            .with_context(|| format!("line {}: bad col `{}`", line, col))?;
        let orientation = orientation
            .parse::<Orientation>()
            .with_context(|| format!("line {}: bad orientation", line))?;
        moves.push(ScriptedMove {
            line,
            action: Move::new(player, Edge::new(row, col, orientation)),
        });
    }
    Ok(moves)
}

/// Applies every scripted move to `lattice`, stopping at the first rejection.
pub fn apply(lattice: &mut Lattice, moves: &[ScriptedMove], board: &BoardArgs) -> Result<()> {
    for scripted in moves {
        let Move { player, edge } = scripted.action;
        let record = match lattice.make_move(edge, player) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = scripted.line, error = %e, "Move rejected");
                bail!("line {}: move {} rejected: {}", scripted.line, scripted.action, e);
            }
        };
        if !record.squares_completed().is_empty() {
            info!(record = %record, "Squares completed");
        }
        if board.show {
            println!("{}", board.view(lattice));
        }
    }
    Ok(())
}

/// Replays the game in `path` and prints the final board and tallies.
#[instrument(skip(lattice), fields(path = %path.display()))]
pub fn run(mut lattice: Lattice, path: &Path, board: BoardArgs) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read move file {}", path.display()))?;
    let moves = parse_script(&text)?;
    info!(moves = moves.len(), "Replaying game");

    apply(&mut lattice, &moves, &board)?;

    if !board.show {
        println!("{}", board.view(&lattice));
    }
    for (player, squares) in tallies(&lattice) {
        println!("Player {}: {} squares", player, squares);
    }
    if lattice.is_full() {
        info!("Board complete");
    } else {
        info!(free = lattice.free_edge_count(), "Board incomplete");
    }
    Ok(())
}
