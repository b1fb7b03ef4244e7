//! Built-in tools for webdesk.
//!
//! These tools are always available and provide the terminal's command set.

mod cat;
mod cd;
mod clear;
mod echo;
mod grep;
mod help;
mod history;
mod info;
mod ls;
mod mkdir;
mod mv;
mod neofetch;
mod net;
mod ps;
mod pwd;
mod rm;
mod touch;
mod tree;
mod wc;

use super::{ExecContext, ToolRegistry};
use crate::vfs::VfsPath;

/// Register all built-in tools with the registry.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(help::Help);
    registry.register(clear::Clear);
    registry.register(pwd::Pwd);
    registry.register(cd::Cd);
    registry.register(ls::Ls);
    registry.register(mkdir::Mkdir);
    registry.register(touch::Touch);
    registry.register(rm::Rm);
    registry.register(mv::Mv);
    registry.register(cat::Cat);
    registry.register(echo::Echo);
    registry.register(grep::Grep);
    registry.register(wc::Wc);
    registry.register(history::History);
    registry.register(tree::Tree);
    registry.register(ps::Ps);
    registry.register(info::Whoami);
    registry.register(info::Hostname);
    registry.register(info::Date);
    registry.register(info::Uname);
    registry.register(neofetch::Neofetch);
    registry.register(net::Ping);
    registry.register(net::Curl);
}

/// Resolve `arg` and split it into parent folder and entry name.
///
/// `None` when it resolves to the root, which has no parent.
fn split_target(ctx: &ExecContext, arg: &str) -> Option<(VfsPath, String)> {
    let path = ctx.resolve_path(arg);
    path.split_last()
        .map(|(parent, name)| (parent, name.to_string()))
}

/// Content of the file `arg` names, if it names one.
fn read_file(ctx: &ExecContext, arg: &str) -> Option<String> {
    let (parent, name) = split_target(ctx, arg)?;
    let vfs = ctx.vfs.lock();
    vfs.get_file_content(&parent, &name).map(str::to_string)
}

/// Text behind an argument: a file's content when `arg` names a file,
/// otherwise the argument itself.
fn file_or_text(ctx: &ExecContext, arg: &str) -> String {
    read_file(ctx, arg).unwrap_or_else(|| arg.to_string())
}

/// Human-readable size: `512B`, `1.5K`, `3.0M`.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["K", "M", "G", "T"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1}{}", UNITS[unit])
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::interpreter::ExecResult;
    use crate::tools::{ExecContext, Identity};
    use crate::vfs::{default_tree, SharedVfs, VfsPath, VirtualFs};
    use crate::window::{SharedWindows, WindowManager};

    /// Fresh context at `/home/guest` over the default tree.
    pub fn ctx() -> ExecContext {
        ExecContext::new(
            SharedVfs::new(VirtualFs::in_memory(default_tree("guest"))),
            SharedWindows::new(WindowManager::default()),
            Identity::new("guest", "webdesk"),
        )
    }

    /// Context whose cwd is an empty `/home/guest/work` holding `files`.
    ///
    /// A trailing `/` makes a folder.
    pub fn ctx_with(files: &[(&str, &str)]) -> ExecContext {
        let mut ctx = ctx();
        let work = VfsPath::parse("/home/guest/work");
        {
            let mut vfs = ctx.vfs.lock();
            vfs.create_folder(&VfsPath::parse("/home/guest"), "work").unwrap();
            for (name, content) in files {
                match name.strip_suffix('/') {
                    Some(folder) => vfs.create_folder(&work, folder).unwrap(),
                    None => vfs.create_file(&work, name, *content).unwrap(),
                }
            }
        }
        ctx.set_cwd(work);
        ctx
    }

    /// Output text of every line.
    pub fn texts(result: &ExecResult) -> Vec<String> {
        result.lines.iter().map(|l| l.text.clone()).collect()
    }
}
