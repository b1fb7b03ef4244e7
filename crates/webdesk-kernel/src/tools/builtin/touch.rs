//! touch: Create empty files.

use async_trait::async_trait;

use super::split_target;
use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};
use crate::vfs::VfsError;

/// Touch tool: creates empty files. Existing names are an error.
pub struct Touch;

#[async_trait]
impl Tool for Touch {
    fn name(&self) -> &str {
        "touch"
    }

    fn description(&self) -> &str {
        "Create a new file"
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if args.is_empty() {
            return ExecResult::failure(1, "touch: missing file operand");
        }

        let mut out = ExecResult::empty();
        for arg in &args.positional {
            let created = match split_target(ctx, arg) {
                Some((parent, name)) => ctx.vfs.lock().create_file(&parent, &name, ""),
                None => Err(VfsError::AlreadyExists(arg.clone())),
            };
            match created {
                Ok(()) => out.push(OutputLine::plain(format!("Created file: {arg}"))),
                Err(e) => {
                    out.push(OutputLine::error(format!(
                        "touch: cannot process '{arg}': {}",
                        e.reason()
                    )));
                    out.code = 1;
                }
            }
        }
        out
    }
}
