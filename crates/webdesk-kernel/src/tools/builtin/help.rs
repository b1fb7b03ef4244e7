//! help: List available commands.

use async_trait::async_trait;

use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};

/// Help tool: every registered command, sorted, with its description.
pub struct Help;

#[async_trait]
impl Tool for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Show available commands"
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let mut lines = vec![OutputLine::plain("Available commands:")];
        lines.extend(
            ctx.commands
                .iter()
                .map(|cmd| OutputLine::plain(format!("  {:<10}- {}", cmd.name, cmd.description))),
        );
        ExecResult::from_lines(lines)
    }
}
