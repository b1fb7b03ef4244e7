//! history: List entered commands.

use async_trait::async_trait;

use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};

/// History tool: numbers every command entered this session, oldest first.
pub struct History;

#[async_trait]
impl Tool for History {
    fn name(&self) -> &str {
        "history"
    }

    fn description(&self) -> &str {
        "Show command history"
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        ExecResult::from_lines(
            ctx.history
                .iter()
                .enumerate()
                .map(|(i, cmd)| OutputLine::plain(format!("  {}  {cmd}", i + 1)))
                .collect(),
        )
    }
}
