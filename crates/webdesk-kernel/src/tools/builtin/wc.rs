//! wc: Count lines, words and characters.

use async_trait::async_trait;

use super::read_file;
use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};

/// Wc tool: counts each text argument (a file's content when it names one),
/// then piped output as plain text.
///
/// Flags `-l`, `-w` and `-c` select columns; none selects all three.
pub struct Wc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    lines: usize,
    words: usize,
    chars: usize,
}

impl Counts {
    fn of(text: &str) -> Self {
        Self {
            lines: text.lines().count(),
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }
}

#[async_trait]
impl Tool for Wc {
    fn name(&self) -> &str {
        "wc"
    }

    fn description(&self) -> &str {
        "Count lines, words and characters"
    }

    fn reads_stdin(&self) -> bool {
        true
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if args.is_empty() && args.stdin.is_none() {
            return ExecResult::failure(1, "Usage: wc <text>");
        }

        let (mut lines, mut words, mut chars) =
            (args.has_flag('l'), args.has_flag('w'), args.has_flag('c'));
        if !(lines || words || chars) {
            (lines, words, chars) = (true, true, true);
        }

        let columns_for = |counts: Counts| {
            let mut columns = Vec::new();
            if lines {
                columns.push(counts.lines.to_string());
            }
            if words {
                columns.push(counts.words.to_string());
            }
            if chars {
                columns.push(counts.chars.to_string());
            }
            columns
        };

        let mut out = ExecResult::empty();
        for input in &args.positional {
            let file = read_file(ctx, input);
            let mut columns = columns_for(Counts::of(file.as_deref().unwrap_or(input)));
            if file.is_some() {
                columns.push(input.clone());
            }
            out.push(OutputLine::plain(columns.join(" ")));
        }
        if let Some(text) = &args.stdin {
            out.push(OutputLine::plain(columns_for(Counts::of(text)).join(" ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing;

    #[test]
    fn counts() {
        assert_eq!(
            Counts::of("one two\nthree"),
            Counts { lines: 2, words: 3, chars: 13 }
        );
        assert_eq!(Counts::of(""), Counts::default());
    }

    #[tokio::test]
    async fn test_wc_text() {
        let mut ctx = testing::ctx();
        let result = Wc
            .execute(ToolArgs::positional(["a b\nc"]), &mut ctx)
            .await;
        assert_eq!(testing::texts(&result), vec!["2 3 5"]);
    }

    #[tokio::test]
    async fn test_wc_stdin_matching_a_file_name() {
        let mut ctx = testing::ctx_with(&[("a.txt", "")]);
        let args = ToolArgs::new().flag("-l").with_stdin("a.txt");
        let result = Wc.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["1"]);
    }

    #[tokio::test]
    async fn test_wc_file_and_flags() {
        let mut ctx = testing::ctx_with(&[("notes.txt", "x\ny\nz")]);
        let result = Wc
            .execute(ToolArgs::positional(["notes.txt"]).flag("-l"), &mut ctx)
            .await;
        assert_eq!(testing::texts(&result), vec!["3 notes.txt"]);
    }
}
