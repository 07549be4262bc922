/// Submitted lines plus a recall cursor in `[0, len]`.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
        self.cursor = self.entries.len();
    }

    /// Steps back one entry, stopping at the oldest. `None` when empty.
    pub fn recall_previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Steps forward one entry. Moving past the newest yields `""`.
    pub fn recall_next(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1).min(self.entries.len());
        Some(self.entries.get(self.cursor).map(String::as_str).unwrap_or(""))
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recall_on_empty_history_is_noop() {
        let mut history = History::new();
        assert_eq!(history.recall_previous(), None);
        assert_eq!(history.recall_next(), None);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_previous_clamps_at_oldest() {
        let mut history = History::new();
        history.push("help");
        history.push("scan a.com");
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.recall_previous(), Some("scan a.com"));
        assert_eq!(history.recall_previous(), Some("help"));
        assert_eq!(history.recall_previous(), Some("help"));
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_next_past_newest_is_empty() {
        let mut history = History::new();
        history.push("help");
        history.push("clear");
        history.recall_previous();
        history.recall_previous();
        assert_eq!(history.recall_next(), Some("clear"));
        assert_eq!(history.recall_next(), Some(""));
        assert_eq!(history.recall_next(), Some(""));
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn test_push_resets_cursor() {
        let mut history = History::new();
        history.push("a");
        history.recall_previous();
        history.push("b");
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.entries(), &["a".to_string(), "b".to_string()]);
    }
}
