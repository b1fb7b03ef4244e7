//! ps: List open windows as processes.

use async_trait::async_trait;

use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};

/// Ps tool: one row per open window, in creation order.
pub struct Ps;

#[async_trait]
impl Tool for Ps {
    fn name(&self) -> &str {
        "ps"
    }

    fn description(&self) -> &str {
        "List running windows"
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let windows = ctx.windows.lock();
        let mut out = ExecResult::from_lines(vec![OutputLine::plain("  PID   TTY          TIME CMD")]);
        if windows.is_empty() {
            out.push(OutputLine::plain("  1     pts/0        0:00 idle"));
        }
        for (i, window) in windows.windows().iter().enumerate() {
            out.push(OutputLine::plain(format!(
                "  {}  pts/0      0:00 {}",
                1000 + i,
                window.title
            )));
        }
        out
    }
}
