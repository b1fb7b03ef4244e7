//! mv: Move or rename entries.

use async_trait::async_trait;

use super::split_target;
use crate::interpreter::{ExecResult, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};
use crate::vfs::{NodeRef, VfsError};

/// Mv tool: renames within a folder or moves into another one.
///
/// When the destination is an existing folder, sources keep their names
/// inside it. Several sources require a folder destination.
pub struct Mv;

#[async_trait]
impl Tool for Mv {
    fn name(&self) -> &str {
        "mv"
    }

    fn description(&self) -> &str {
        "Move or rename a file or directory"
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let (dest, sources) = match args.positional.split_last() {
            None => return ExecResult::failure(1, "mv: missing file operand"),
            Some((only, [])) => {
                return ExecResult::failure(
                    1,
                    format!("mv: missing destination file operand after '{only}'"),
                );
            }
            Some((dest, sources)) => (dest, sources),
        };

        let dest_path = ctx.resolve_path(dest);
        let mut vfs = ctx.vfs.lock();
        let into_folder = matches!(vfs.lookup(&dest_path), Ok(NodeRef::Folder(_)));
        if sources.len() > 1 && !into_folder {
            return ExecResult::failure(1, format!("mv: target '{dest}' is not a directory"));
        }

        let mut out = ExecResult::empty();
        for src in sources {
            let moved = match split_target(ctx, src) {
                None => Err(VfsError::IntoItself("/".to_string())),
                Some((from, name)) if into_folder => vfs.move_item(&from, &name, &dest_path, &name),
                Some((from, name)) => match dest_path.split_last() {
                    Some((to, new_name)) => vfs.move_item(&from, &name, &to, new_name),
                    None => Err(VfsError::AlreadyExists("/".to_string())),
                },
            };
            if let Err(e) = moved {
                out.push(OutputLine::error(format!(
                    "mv: cannot move '{src}' to '{dest}': {}",
                    e.reason()
                )));
                out.code = 1;
            }
        }
        out
    }
}
