//! Command history with Up/Down recall.

/// History of one terminal session plus the recall cursor.
///
/// The cursor sits at `len()` after every new entry. Up moves it back while
/// it is above zero; Down moves it forward and yields an empty line once it
/// passes the newest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalSession {
    history: Vec<String>,
    index: usize,
}

impl TerminalSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entered command and park the cursor after it.
    pub fn push(&mut self, command: impl Into<String>) {
        self.history.push(command.into());
        self.index = self.history.len();
    }

    /// Entered commands, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Step back one entry. `None` at the oldest entry or with no history.
    pub fn recall_prev(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.history.get(self.index).map(String::as_str)
    }

    /// Step forward one entry; past the newest this is the empty line.
    pub fn recall_next(&mut self) -> &str {
        self.index = (self.index + 1).min(self.history.len());
        self.history.get(self.index).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(commands: &[&str]) -> TerminalSession {
        let mut session = TerminalSession::new();
        for cmd in commands {
            session.push(*cmd);
        }
        session
    }

    #[test]
    fn up_walks_back_and_stops() {
        let mut s = session(&["ls", "pwd"]);
        assert_eq!(s.recall_prev(), Some("pwd"));
        assert_eq!(s.recall_prev(), Some("ls"));
        assert_eq!(s.recall_prev(), None);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn down_past_end_is_empty() {
        let mut s = session(&["ls", "pwd"]);
        s.recall_prev();
        s.recall_prev();
        assert_eq!(s.recall_next(), "pwd");
        assert_eq!(s.recall_next(), "");
        assert_eq!(s.recall_next(), "");
        assert_eq!(s.index(), 2);
    }

    #[test]
    fn push_resets_cursor() {
        let mut s = session(&["a", "b"]);
        s.recall_prev();
        s.push("c");
        assert_eq!(s.index(), 3);
        assert_eq!(s.recall_prev(), Some("c"));
    }

    #[test]
    fn empty_history() {
        let mut s = TerminalSession::new();
        assert_eq!(s.recall_prev(), None);
        assert_eq!(s.recall_next(), "");
    }
}
