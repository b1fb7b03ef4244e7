//! echo: Print arguments.

use async_trait::async_trait;

use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};

/// Echo tool: prints its arguments joined by single spaces.
///
/// Dash-prefixed words are printed too; echo takes no options.
pub struct Echo;

#[async_trait]
impl Tool for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Display a line of text"
    }

    async fn execute(&self, args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        let output = args.words.join(" ");
        if output.is_empty() {
            // A bare echo still prints one empty line.
            return ExecResult::from_lines(vec![OutputLine::plain("")]);
        }
        ExecResult::success(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing;

    #[tokio::test]
    async fn test_echo_words_in_order() {
        let mut ctx = testing::ctx();
        let mut args = ToolArgs::positional(["hello"]);
        args = args.flag("-x");
        args.push_positional("world");

        let result = Echo.execute(args, &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["hello -x world"]);
    }

    #[tokio::test]
    async fn test_echo_empty() {
        let mut ctx = testing::ctx();
        let result = Echo.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec![""]);
    }
}
