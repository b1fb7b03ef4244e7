//! Execution context for tools.

use std::sync::Arc;
use std::time::Instant;

use crate::interpreter::OutputLine;
use crate::net::{HttpProbe, OfflineProbe};
use crate::scheduler::PrintQueue;
use crate::vfs::{SharedVfs, VfsPath};
use crate::window::SharedWindows;

/// Who the terminal says it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub hostname: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            hostname: hostname.into(),
        }
    }

    /// `/home/<username>`.
    pub fn home(&self) -> VfsPath {
        VfsPath::new(["home", self.username.as_str()])
    }
}

/// Name and description of a registered command, as `help` lists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
}

/// Execution context passed to tools.
///
/// Provides access to the VFS, the window manager and the session state.
#[derive(Clone)]
pub struct ExecContext {
    /// Virtual filesystem.
    pub vfs: SharedVfs,
    /// Window registry, for `ps` and `neofetch`.
    pub windows: SharedWindows,
    /// Current working directory.
    pub cwd: VfsPath,
    pub identity: Identity,
    /// Commands entered so far, oldest first.
    pub history: Vec<String>,
    /// Registered commands, sorted by name.
    pub commands: Vec<CommandInfo>,
    pub http: Arc<dyn HttpProbe>,
    /// When the session started, for uptime.
    pub started_at: Instant,
    live: Option<PrintQueue>,
    emitted: Vec<OutputLine>,
}

impl std::fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("cwd", &self.cwd.to_string())
            .field("identity", &self.identity)
            .field("history", &self.history.len())
            .field("live", &self.live.is_some())
            .finish()
    }
}

impl ExecContext {
    /// Create a new execution context starting in the user's home.
    pub fn new(vfs: SharedVfs, windows: SharedWindows, identity: Identity) -> Self {
        Self {
            vfs,
            windows,
            cwd: identity.home(),
            identity,
            history: Vec::new(),
            commands: Vec::new(),
            http: Arc::new(OfflineProbe),
            started_at: Instant::now(),
            live: None,
            emitted: Vec::new(),
        }
    }

    pub fn with_http(mut self, http: Arc<dyn HttpProbe>) -> Self {
        self.http = http;
        self
    }

    /// `/home/<user>`.
    pub fn home(&self) -> VfsPath {
        self.identity.home()
    }

    /// Resolve `input` against the cwd. `~` at the start means home.
    pub fn resolve_path(&self, input: &str) -> VfsPath {
        if input == "~" {
            return self.home();
        }
        if let Some(rest) = input.strip_prefix("~/") {
            return VfsPath::resolve(rest, &self.home());
        }
        VfsPath::resolve(input, &self.cwd)
    }

    /// Change the current working directory.
    pub fn set_cwd(&mut self, path: VfsPath) {
        self.cwd = path;
    }

    /// Route [`emit`](Self::emit) straight to a print queue.
    pub fn set_live(&mut self, queue: Option<PrintQueue>) {
        self.live = queue;
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Print a line before the tool finishes.
    ///
    /// With a live queue the line is queued at once; otherwise it is held and
    /// placed ahead of the tool's result lines.
    pub fn emit(&mut self, line: OutputLine) {
        match &self.live {
            Some(queue) => {
                queue.enqueue(line);
            }
            None => self.emitted.push(line),
        }
    }

    /// Lines emitted while not live, oldest first.
    pub fn take_emitted(&mut self) -> Vec<OutputLine> {
        std::mem::take(&mut self.emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{default_tree, VirtualFs};
    use crate::window::WindowManager;

    fn ctx() -> ExecContext {
        ExecContext::new(
            SharedVfs::new(VirtualFs::in_memory(default_tree("guest"))),
            SharedWindows::new(WindowManager::default()),
            Identity::new("guest", "webdesk"),
        )
    }

    #[test]
    fn starts_at_home() {
        assert_eq!(ctx().cwd.to_string(), "/home/guest");
    }

    #[test]
    fn tilde_resolves_from_home() {
        let mut ctx = ctx();
        ctx.set_cwd(VfsPath::root());
        assert_eq!(ctx.resolve_path("~").to_string(), "/home/guest");
        assert_eq!(ctx.resolve_path("~/Music").to_string(), "/home/guest/Music");
        assert_eq!(ctx.resolve_path("home").to_string(), "/home");
    }

    #[test]
    fn emit_without_queue_is_held() {
        let mut ctx = ctx();
        ctx.emit(OutputLine::plain("early"));
        assert_eq!(ctx.take_emitted(), vec![OutputLine::plain("early")]);
        assert!(ctx.take_emitted().is_empty());
    }
}
