//! tree: Draw a folder hierarchy.

use async_trait::async_trait;

use crate::interpreter::{ExecResult, LineStyle, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};
use crate::vfs::{Folder, Node};

/// Tree tool: draws the folder at the given path (default cwd) with box
/// drawing connectors, folders suffixed with `/`.
pub struct Tree;

#[async_trait]
impl Tool for Tree {
    fn name(&self) -> &str {
        "tree"
    }

    fn description(&self) -> &str {
        "Display directory tree"
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let path = match args.first() {
            Some(target) => ctx.resolve_path(target),
            None => ctx.cwd.clone(),
        };

        let vfs = ctx.vfs.lock();
        let Ok(folder) = vfs.get_folder(&path) else {
            return ExecResult::failure(1, "tree: error reading directory");
        };

        let mut out = ExecResult::from_lines(vec![OutputLine::plain(path.to_string())]);
        draw(folder, "", &mut out);
        out
    }
}

fn draw(folder: &Folder, prefix: &str, out: &mut ExecResult) {
    let count = folder.len();
    for (i, (name, node)) in folder.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        match node {
            Node::File(_) => out.push(OutputLine::plain(format!("{prefix}{connector}{name}"))),
            Node::Folder(child) => {
                out.push(OutputLine::styled(
                    format!("{prefix}{connector}{name}/"),
                    LineStyle::Folder,
                ));
                let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
                draw(child, &nested, out);
            }
        }
    }
}
