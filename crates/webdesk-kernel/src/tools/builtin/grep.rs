//! grep: Filter lines by pattern.

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use super::file_or_text;
use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};

/// Grep tool: prints lines of its text arguments that match a pattern.
///
/// Matching is case-insensitive. A pattern that is not a valid regex is
/// matched literally. Each text argument naming a file is read from the
/// VFS; otherwise the argument itself is searched. Piped output is searched
/// last, as plain text.
///
/// Flags: `-v` invert, `-n` line numbers, `-c` count only.
pub struct Grep;

enum Matcher {
    Regex(Regex),
    /// Lowercased needle, for patterns the regex engine rejects.
    Literal(String),
}

impl Matcher {
    fn new(pattern: &str) -> Self {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => Self::Regex(re),
            Err(_) => Self::Literal(pattern.to_lowercase()),
        }
    }

    fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Regex(re) => re.is_match(line),
            Self::Literal(needle) => line.to_lowercase().contains(needle),
        }
    }
}

#[async_trait]
impl Tool for Grep {
    fn name(&self) -> &str {
        "grep"
    }

    fn description(&self) -> &str {
        "Search text for a pattern"
    }

    fn reads_stdin(&self) -> bool {
        true
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let [pattern, inputs @ ..] = args.positional.as_slice() else {
            return ExecResult::failure(2, "Usage: grep <pattern> <text>");
        };
        if inputs.is_empty() && args.stdin.is_none() {
            return ExecResult::failure(2, "Usage: grep <pattern> <text>");
        }

        let matcher = Matcher::new(pattern);
        let invert = args.has_flag('v');
        let numbered = args.has_flag('n');
        let count_only = args.has_flag('c');

        let mut out = ExecResult::empty();
        let mut count = 0usize;
        let texts = inputs
            .iter()
            .map(|input| file_or_text(ctx, input))
            .chain(args.stdin.clone());
        for text in texts {
            for (i, line) in text.lines().enumerate() {
                if matcher.is_match(line) == invert {
                    continue;
                }
                count += 1;
                if count_only {
                    continue;
                }
                let shown = if numbered {
                    format!("{}:{line}", i + 1)
                } else {
                    line.to_string()
                };
                out.push(OutputLine::plain(shown));
            }
        }

        if count_only {
            out.push(OutputLine::plain(count.to_string()));
        }
        if count == 0 {
            out.code = 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing;

    #[tokio::test]
    async fn test_grep_case_insensitive() {
        let mut ctx = testing::ctx();
        let args = ToolArgs::positional(["hello", "Hello World\ngoodbye\nHELLO again"]);
        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["Hello World", "HELLO again"]);
    }

    #[tokio::test]
    async fn test_grep_regex_and_literal_fallback() {
        let mut ctx = testing::ctx();
        let args = ToolArgs::positional([".txt", "a.txt\nb.png\nc.txt"]);
        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["a.txt", "c.txt"]);

        let args = ToolArgs::positional(["(", "f(x)\ny"]);
        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["f(x)"]);
    }

    #[tokio::test]
    async fn test_grep_reads_files() {
        let mut ctx = testing::ctx_with(&[("log.txt", "ok\nerror: disk\nok")]);
        let args = ToolArgs::positional(["error", "log.txt"]).flag("-n");
        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["2:error: disk"]);
    }

    #[tokio::test]
    async fn test_grep_stdin_is_never_a_path() {
        let mut ctx = testing::ctx_with(&[("a.txt", "")]);
        let args = ToolArgs::positional(["a"]).with_stdin("a.txt");
        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["a.txt"]);
    }

    #[tokio::test]
    async fn test_grep_invert_and_count() {
        let mut ctx = testing::ctx();
        let args = ToolArgs::positional(["a", "apple\nberry\navocado"]).flag("-v");
        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["berry"]);

        let args = ToolArgs::positional(["a", "apple\nberry\navocado"]).flag("-c");
        let result = Grep.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["2"]);
    }

    #[tokio::test]
    async fn test_grep_no_match_and_usage() {
        let mut ctx = testing::ctx();
        let result = Grep
            .execute(ToolArgs::positional(["zzz", "abc"]), &mut ctx)
            .await;
        assert_eq!(result.code, 1);
        assert!(result.lines.is_empty());

        let result = Grep.execute(ToolArgs::positional(["zzz"]), &mut ctx).await;
        assert_eq!(result.code, 2);
        assert_eq!(testing::texts(&result), vec!["Usage: grep <pattern> <text>"]);
    }
}
