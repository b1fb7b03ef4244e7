//! ExecResult: what every command hands back to the terminal.
//!
//! Output is a list of discrete lines rather than a byte stream. Each line
//! carries a style hint so a front end can color folders and errors, and the
//! echoed command line carries the prompt it was typed at.

/// How a line should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Plain,
    /// A folder name in a listing.
    Folder,
    /// A diagnostic.
    Error,
    /// An echoed command line or control marker, drawn after its prompt.
    Command,
    /// Decorative output such as banners.
    Accent,
}

/// One line of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub style: LineStyle,
    /// Prompt drawn before `text`, for echoed commands.
    pub prompt: Option<String>,
}

impl OutputLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, LineStyle::Plain)
    }

    pub fn styled(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
            prompt: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::styled(text, LineStyle::Error)
    }

    /// A command line echoed after `prompt`.
    pub fn command(prompt: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: LineStyle::Command,
            prompt: Some(prompt.into()),
        }
    }

    /// The line as it appears on screen, prompt included.
    pub fn rendered(&self) -> String {
        match &self.prompt {
            Some(prompt) => format!("{prompt}{}", self.text),
            None => self.text.clone(),
        }
    }
}

/// The result of executing a command or pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i64,
    /// Output lines, in order.
    pub lines: Vec<OutputLine>,
    /// Clear the screen before drawing `lines`.
    pub clear: bool,
}

impl ExecResult {
    /// A successful result printing `out`, split on newlines.
    ///
    /// Empty `out` prints nothing.
    pub fn success(out: impl Into<String>) -> Self {
        let out = out.into();
        if out.is_empty() {
            return Self::empty();
        }
        Self::from_lines(out.split('\n').map(OutputLine::plain).collect())
    }

    /// A successful result that prints nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<OutputLine>) -> Self {
        Self {
            code: 0,
            lines,
            clear: false,
        }
    }

    /// A failed result with one diagnostic line.
    pub fn failure(code: i64, err: impl Into<String>) -> Self {
        Self {
            code,
            lines: vec![OutputLine::error(err)],
            clear: false,
        }
    }

    /// A successful result that clears the screen.
    pub fn clear_screen() -> Self {
        Self {
            clear: true,
            ..Self::default()
        }
    }

    /// True if the command succeeded (exit code 0).
    pub fn ok(&self) -> bool {
        self.code == 0
    }

    pub fn push(&mut self, line: OutputLine) {
        self.lines.push(line);
    }

    /// Set the exit code, keeping output.
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Plain text of every line joined with newlines, as a pipe would see it.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_splits_lines() {
        let result = ExecResult::success("a\nb");
        assert!(result.ok());
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.text(), "a\nb");
    }

    #[test]
    fn empty_success_prints_nothing() {
        assert!(ExecResult::success("").lines.is_empty());
    }

    #[test]
    fn failure_is_one_error_line() {
        let result = ExecResult::failure(127, "bash: x: command not found");
        assert!(!result.ok());
        assert_eq!(result.lines[0].style, LineStyle::Error);
    }

    #[test]
    fn rendered_includes_prompt() {
        let line = OutputLine::command("guest@webdesk:/$ ", "ls");
        assert_eq!(line.rendered(), "guest@webdesk:/$ ls");
    }
}
