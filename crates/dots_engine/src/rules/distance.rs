//! Distance-to-completion.

/// Edges still needed to finish a square once the edge itself is drawn,
/// given how many edges of its completion group are already set.
pub const fn distance(count: u8) -> u8 {
    3u8.saturating_sub(count)
}

/// Minimum distance over an edge's present sides.
///
/// `0` means drawing the edge completes a square; `1` means it leaves a
/// square for the next player. `None` when no side is present.
pub fn distance_from_counts(counts: impl IntoIterator<Item = u8>) -> Option<u8> {
    counts.into_iter().map(distance).min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_from_counts() {
        assert_eq!(distance_from_counts([0]), Some(3));
        assert_eq!(distance_from_counts([1, 3]), Some(0));
        assert_eq!(distance_from_counts([2, 0]), Some(1));
        assert_eq!(distance_from_counts(std::iter::empty()), None);
    }
}
