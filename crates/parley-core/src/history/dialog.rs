//! Dialog reconstruction by walking a reply chain backwards.
//!
//! The walk only needs "what did this line reply to?", so it is written
//! against [`ChainLookup`] rather than the content-addressed map directly.

use parley_types::history::ChatHistory;

/// Predecessor lookup over a chain.
pub trait ChainLookup {
    /// The line `line` replied to, if recorded.
    fn predecessor(&self, line: &str) -> Option<&str>;
}

impl ChainLookup for ChatHistory {
    fn predecessor(&self, line: &str) -> Option<&str> {
        self.get(line).map(|entry| entry.line.as_str())
    }
}

/// Assemble a dialog of at most `depth` lines, oldest first.
///
/// `starting_lines` is `[newest, previous]` as returned by
/// [`ChatHistoryHandle::record`](super::store::ChatHistoryHandle::record).
/// With fewer than two starting lines there is nothing to walk and they are
/// returned unchanged. Otherwise the chain is followed from `previous` for up
/// to `depth - 2` steps; a missing link ends the dialog early.
pub fn reconstruct(starting_lines: &[String], lookup: &impl ChainLookup, depth: usize) -> Vec<String> {
    if starting_lines.len() < 2 {
        return starting_lines.to_vec();
    }

    let mut lines = starting_lines.to_vec();
    let mut cursor = starting_lines[1].as_str();
    for step in 0..depth.saturating_sub(2) {
        let Some(previous) = lookup.predecessor(cursor) else {
            break;
        };
        tracing::trace!(remembered = step + 1, "followed reply chain");
        lines.push(previous.to_string());
        cursor = previous;
    }

    lines.reverse();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::history::MessageEntry;

    fn chain(links: &[(&str, &str)]) -> ChatHistory {
        links
            .iter()
            .map(|(line, previous)| (line.to_string(), MessageEntry::new(*previous)))
            .collect()
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_line_returned_unchanged() {
        let history = chain(&[("B: 2", "A: 1")]);
        let start = lines(&["B: 2"]);
        assert_eq!(reconstruct(&start, &history, 10), start);
    }

    #[test]
    fn test_empty_start_returned_unchanged() {
        let history = ChatHistory::new();
        assert!(reconstruct(&[], &history, 10).is_empty());
    }

    #[test]
    fn test_depth_two_never_walks() {
        let history = chain(&[("B: 2", "A: 1"), ("A: 1", "Z: 0")]);
        let start = lines(&["C: 3", "B: 2"]);
        assert_eq!(reconstruct(&start, &history, 2), lines(&["B: 2", "C: 3"]));
    }

    #[test]
    fn test_depth_below_two_only_reorders_start() {
        let history = chain(&[("B: 2", "A: 1")]);
        let start = lines(&["C: 3", "B: 2"]);
        assert_eq!(reconstruct(&start, &history, 0), lines(&["B: 2", "C: 3"]));
        assert_eq!(reconstruct(&start, &history, 1), lines(&["B: 2", "C: 3"]));
    }

    #[test]
    fn test_walk_stops_at_chain_end() {
        let history = chain(&[("B: 2", "A: 1")]);
        let start = lines(&["C: 3", "B: 2"]);
        assert_eq!(
            reconstruct(&start, &history, 5),
            lines(&["A: 1", "B: 2", "C: 3"])
        );
    }

    #[test]
    fn test_walk_bounded_by_depth() {
        let history = chain(&[("D: 4", "C: 3"), ("C: 3", "B: 2"), ("B: 2", "A: 1")]);
        let start = lines(&["E: 5", "D: 4"]);
        assert_eq!(
            reconstruct(&start, &history, 4),
            lines(&["B: 2", "C: 3", "D: 4", "E: 5"])
        );
    }

    #[test]
    fn test_broken_chain_yields_shorter_dialog() {
        // "B: 2" was swept, so the walk cannot reach "A: 1".
        let history = chain(&[("C: 3", "B: 2")]);
        let start = lines(&["D: 4", "C: 3"]);
        assert_eq!(
            reconstruct(&start, &history, 10),
            lines(&["B: 2", "C: 3", "D: 4"])
        );
    }
}
