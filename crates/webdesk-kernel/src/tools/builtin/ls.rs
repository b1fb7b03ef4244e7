//! ls: List directory contents.

use async_trait::async_trait;

use super::human_size;
use crate::interpreter::{ExecResult, LineStyle, OutputLine};
use crate::tools::{ExecContext, Tool, ToolArgs};
use crate::vfs::{Folder, NodeRef, VfsPath, VirtualFs};

/// Ls tool: lists folder entries, marking folders with a trailing `/`.
///
/// Flags: `-a` dotfiles, `-l` long form, `-h` human sizes, `-R` recursive,
/// `-r` reverse order.
pub struct Ls;

#[derive(Debug, Clone, Copy)]
struct Options {
    all: bool,
    long: bool,
    human: bool,
    recursive: bool,
    reverse: bool,
}

impl Options {
    fn from_args(args: &ToolArgs) -> Self {
        Self {
            all: args.has_flag('a'),
            long: args.has_flag('l'),
            human: args.has_flag('h'),
            recursive: args.has_flag('R'),
            reverse: args.has_flag('r'),
        }
    }
}

#[async_trait]
impl Tool for Ls {
    fn name(&self) -> &str {
        "ls"
    }

    fn description(&self) -> &str {
        "List directory contents"
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let opts = Options::from_args(&args);
        let vfs = ctx.vfs.lock();
        let mut out = ExecResult::empty();

        if args.is_empty() {
            match vfs.get_folder(&ctx.cwd) {
                Ok(folder) => list(&vfs, &ctx.cwd, folder, opts, false, &mut out),
                Err(_) => {
                    out.push(OutputLine::error(format!(
                        "ls: cannot access '{}': No such file or directory",
                        ctx.cwd
                    )));
                    out.code = 2;
                }
            }
            return out;
        }

        let headers = args.positional.len() > 1 || opts.recursive;
        for (i, target) in args.positional.iter().enumerate() {
            let path = ctx.resolve_path(target);
            match vfs.lookup(&path) {
                Ok(NodeRef::Folder(folder)) => {
                    if headers && i > 0 {
                        out.push(OutputLine::plain(""));
                    }
                    list(&vfs, &path, folder, opts, headers, &mut out);
                }
                Ok(file @ NodeRef::File(_)) => out.push(entry_line(target, file, opts)),
                Err(_) => {
                    out.push(OutputLine::error(format!(
                        "ls: cannot access '{target}': No such file or directory"
                    )));
                    out.code = 2;
                }
            }
        }
        out
    }
}

/// Visible child names of `folder` in listing order.
fn visible_names(folder: &Folder, opts: Options) -> Vec<String> {
    let mut names: Vec<String> = folder
        .names()
        .into_iter()
        .filter(|n| opts.all || !n.starts_with('.'))
        .collect();
    if opts.reverse {
        names.reverse();
    }
    names
}

fn list(
    vfs: &VirtualFs,
    path: &VfsPath,
    folder: &Folder,
    opts: Options,
    header: bool,
    out: &mut ExecResult,
) {
    if header {
        out.push(OutputLine::plain(format!("{path}:")));
    }
    let names = visible_names(folder, opts);
    for name in &names {
        if let Some(node) = folder.get(name) {
            out.push(entry_line(name, node.into(), opts));
        }
    }

    if !opts.recursive {
        return;
    }
    for name in &names {
        let child = path.join(name);
        if let Ok(sub) = vfs.get_folder(&child) {
            out.push(OutputLine::plain(""));
            list(vfs, &child, sub, opts, true, out);
        }
    }
}

fn entry_line(name: &str, node: NodeRef<'_>, opts: Options) -> OutputLine {
    let (display, style, mode) = match node {
        NodeRef::Folder(_) => (format!("{name}/"), LineStyle::Folder, "drwxr-xr-x"),
        NodeRef::File(_) => (name.to_string(), LineStyle::Plain, "-rw-r--r--"),
    };
    if !opts.long {
        return OutputLine::styled(display, style);
    }
    let size = if opts.human {
        human_size(node.size())
    } else {
        node.size().to_string()
    };
    OutputLine::styled(format!("{mode} {size:>8} {display}"), style)
}
