//! cat: Print file contents.

use async_trait::async_trait;

use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};
use crate::vfs::NodeRef;

/// Cat tool: prints each named file in turn.
pub struct Cat;

#[async_trait]
impl Tool for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn description(&self) -> &str {
        "Display file contents"
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if args.is_empty() {
            return ExecResult::failure(1, "cat: missing file operand");
        }

        let vfs = ctx.vfs.lock();
        let mut out = ExecResult::empty();
        for arg in &args.positional {
            let path = ctx.resolve_path(arg);
            match vfs.lookup(&path) {
                Ok(NodeRef::File(file)) if file.content.is_empty() => {
                    out.push(OutputLine::plain("(empty file)"));
                }
                Ok(NodeRef::File(file)) => {
                    for line in file.content.split('\n') {
                        out.push(OutputLine::plain(line));
                    }
                }
                Ok(NodeRef::Folder(_)) => {
                    out.push(OutputLine::error(format!("cat: {arg}: Is a directory")));
                    out.code = 1;
                }
                Err(_) => {
                    out.push(OutputLine::error(format!(
                        "cat: {arg}: No such file or directory"
                    )));
                    out.code = 1;
                }
            }
        }
        out
    }
}
