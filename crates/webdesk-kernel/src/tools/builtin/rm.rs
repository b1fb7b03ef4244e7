//! rm: Remove files and folders.

use async_trait::async_trait;

use super::split_target;
use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};
use crate::vfs::NodeRef;

/// Rm tool: removes entries. `-r` allows folders, `-f` silences missing
/// targets.
pub struct Rm;

#[async_trait]
impl Tool for Rm {
    fn name(&self) -> &str {
        "rm"
    }

    fn description(&self) -> &str {
        "Remove file or directory"
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let recursive = args.has_flag('r') || args.has_flag('R');
        let force = args.has_flag('f');
        if args.is_empty() {
            if force {
                return ExecResult::empty();
            }
            return ExecResult::failure(1, "rm: missing operand");
        }

        let mut out = ExecResult::empty();
        for arg in &args.positional {
            let failure = |reason: &str| OutputLine::error(format!("rm: cannot remove '{arg}': {reason}"));

            let Some((parent, name)) = split_target(ctx, arg) else {
                out.push(failure("Is the root directory"));
                out.code = 1;
                continue;
            };

            let mut vfs = ctx.vfs.lock();
            let is_folder = match vfs.lookup(&parent.join(&name)) {
                Ok(NodeRef::Folder(_)) => true,
                Ok(NodeRef::File(_)) => false,
                Err(_) => {
                    if !force {
                        out.push(failure("No such file or directory"));
                        out.code = 1;
                    }
                    continue;
                }
            };
            if is_folder && !recursive {
                out.push(failure("Is a directory"));
                out.code = 1;
                continue;
            }

            match vfs.delete_item(&parent, &name) {
                Ok(_) => out.push(OutputLine::plain(format!("Removed: {arg}"))),
                Err(e) => {
                    out.push(failure(e.reason()));
                    out.code = 1;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing;

    #[tokio::test]
    async fn test_rm_file() {
        let mut ctx = testing::ctx_with(&[("a.txt", "")]);
        let result = Rm.execute(ToolArgs::positional(["a.txt"]), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["Removed: a.txt"]);
        assert!(!ctx.vfs.lock().exists(&ctx.cwd, "a.txt"));
    }

    #[tokio::test]
    async fn test_rm_folder_needs_recursive() {
        let mut ctx = testing::ctx_with(&[("dir/", "")]);
        let result = Rm.execute(ToolArgs::positional(["dir"]), &mut ctx).await;
        assert_eq!(testing::texts(&result), vec!["rm: cannot remove 'dir': Is a directory"]);
        assert!(ctx.vfs.lock().exists(&ctx.cwd, "dir"));

        let result = Rm
            .execute(ToolArgs::positional(["dir"]).flag("-r"), &mut ctx)
            .await;
        assert!(result.ok());
        assert!(!ctx.vfs.lock().exists(&ctx.cwd, "dir"));
    }

    #[tokio::test]
    async fn test_rm_force_silences_missing() {
        let mut ctx = testing::ctx_with(&[]);
        let result = Rm.execute(ToolArgs::positional(["ghost"]), &mut ctx).await;
        assert_eq!(
            testing::texts(&result),
            vec!["rm: cannot remove 'ghost': No such file or directory"]
        );

        let result = Rm
            .execute(ToolArgs::positional(["ghost"]).flag("-f"), &mut ctx)
            .await;
        assert!(result.ok());
        assert!(result.lines.is_empty());
    }
}
