//! cd: Change the working directory.

use async_trait::async_trait;

use crate::interpreter::ExecResult;
use crate::tools::{ExecContext, Tool, ToolArgs};
use crate::vfs::VfsError;

/// Cd tool: changes the current working directory.
///
/// With no argument, or `~`, goes home.
pub struct Cd;

#[async_trait]
impl Tool for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn description(&self) -> &str {
        "Change directory"
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let Some(target) = args.first() else {
            ctx.set_cwd(ctx.home());
            return ExecResult::empty();
        };

        let path = ctx.resolve_path(target);
        let checked = ctx.vfs.lock().get_folder(&path).map(|_| ());
        match checked {
            Ok(()) => {
                ctx.set_cwd(path);
                ExecResult::empty()
            }
            Err(VfsError::NotADirectory(_)) => {
                ExecResult::failure(1, format!("cd: {target}: Not a directory"))
            }
            Err(_) => ExecResult::failure(1, format!("cd: {target}: No such file or directory")),
        }
    }
}
