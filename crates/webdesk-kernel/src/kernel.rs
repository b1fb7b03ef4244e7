//! The Kernel: owns the shared state every app shell works against.
//!
//! The Kernel owns and coordinates all core components:
//! - Virtual filesystem (persisted through a [`Storage`] medium)
//! - Window manager (z-order, taskbar, fullscreen)
//! - Tool registry behind the command interpreter
//! - HTTP probe used by the network builtins
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                      Kernel                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────┐  │
//! │  │  SharedVfs   │  │SharedWindows │  │Interpreter│ │
//! │  │  (Storage)   │  │  (Surface)   │  │ (tools)  │  │
//! │  └──────────────┘  └──────────────┘  └──────────┘  │
//! └───────────────────────┬────────────────────────────┘
//!                         │ open_terminal()
//!                   ┌─────▼─────┐
//!                   │ Terminal  │──► PrintQueue ──► OutputSink
//!                   └───────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::interpreter::{ExecResult, Interpreter};
use crate::net::{default_probe, HttpProbe, OfflineProbe};
use crate::scheduler::{OutputSink, PrintQueue, DEFAULT_TYPE_DELAY};
use crate::terminal::Terminal;
use crate::tools::{register_builtins, ExecContext, Identity, Tool, ToolArgs, ToolRegistry};
use crate::vfs::{default_tree, MemoryStorage, SharedVfs, Storage, VfsError, VfsPath, VirtualFs};
use crate::window::{Dimension, SharedWindows, Viewport, WindowManager, WindowSurface};

/// Window id of the terminal.
pub const TERMINAL_WINDOW_ID: &str = "terminal-win";
/// Taskbar icon of the terminal.
pub const TERMINAL_ICON: &str = "/static/icons/terminal.png";
/// Storage key the filesystem blob lives under.
pub const DEFAULT_STORAGE_KEY: &str = "desktopOS_fileSystem";

/// Configuration for kernel initialization.
///
/// Every field has a default, so a config file only needs the ones it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Owner of `/home/<username>`.
    pub username: String,
    pub hostname: String,
    /// Key the filesystem blob is stored under.
    pub storage_key: String,
    /// Per-character render delay of terminal output, in milliseconds.
    pub type_delay_ms: u64,
    pub viewport: Viewport,
    /// Allow `ping` and `curl` to reach the network.
    pub network: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            username: "guest".to_string(),
            hostname: "webdesk".to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            type_delay_ms: DEFAULT_TYPE_DELAY.as_millis() as u64,
            viewport: Viewport::default(),
            network: true,
        }
    }
}

/// Failure to read a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: username must be a non-empty name without '/'")]
    InvalidUsername,
}

impl KernelConfig {
    /// Create a transient config: no render delay, no network.
    pub fn transient() -> Self {
        Self {
            type_delay_ms: 0,
            network: false,
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source, path)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.username.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(ConfigError::InvalidUsername);
        }
        Ok(())
    }

    pub fn type_delay(&self) -> Duration {
        Duration::from_millis(self.type_delay_ms)
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.username.clone(), self.hostname.clone())
    }
}

/// The Kernel: shared VFS, windows and tools for one desktop session.
pub struct Kernel {
    config: KernelConfig,
    vfs: SharedVfs,
    windows: SharedWindows,
    interpreter: Arc<Interpreter>,
    http: Arc<dyn HttpProbe>,
    started_at: Instant,
    /// Context for [`Kernel::execute`], separate from any terminal's.
    exec_ctx: tokio::sync::Mutex<ExecContext>,
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("config", &self.config)
            .field("tools", &self.interpreter.tools().len())
            .finish()
    }
}

impl Kernel {
    /// Create a kernel whose filesystem lives in `storage`.
    ///
    /// The stored tree is loaded and merged with the defaults for the
    /// configured user, or seeded on first run.
    pub fn new(config: KernelConfig, storage: impl Storage + 'static) -> Result<Self, VfsError> {
        let defaults = default_tree(&config.username);
        let vfs = VirtualFs::open(Box::new(storage), config.storage_key.clone(), defaults)?;

        let mut tools = ToolRegistry::new();
        register_builtins(&mut tools);

        let http: Arc<dyn HttpProbe> = if config.network {
            default_probe()
        } else {
            Arc::new(OfflineProbe)
        };

        let vfs = SharedVfs::new(vfs);
        let windows = SharedWindows::new(WindowManager::new(config.viewport));
        let exec_ctx = ExecContext::new(vfs.clone(), windows.clone(), config.identity())
            .with_http(Arc::clone(&http));

        tracing::info!(user = %config.username, key = %config.storage_key, "kernel started");
        Ok(Self {
            windows,
            vfs,
            interpreter: Arc::new(Interpreter::new(tools)),
            http,
            started_at: Instant::now(),
            exec_ctx: tokio::sync::Mutex::new(exec_ctx),
            config,
        })
    }

    /// A kernel over in-memory storage with no render delay or network.
    pub fn transient() -> Result<Self, VfsError> {
        Self::new(KernelConfig::transient(), MemoryStorage::new())
    }

    /// Replace the HTTP probe used by `ping` and `curl`.
    pub fn with_http(mut self, http: Arc<dyn HttpProbe>) -> Self {
        self.exec_ctx.get_mut().http = Arc::clone(&http);
        self.http = http;
        self
    }

    /// Draw windows through `surface`. Windows opened so far are dropped.
    pub fn with_window_surface(mut self, surface: impl WindowSurface + 'static) -> Self {
        self.windows = SharedWindows::new(WindowManager::with_surface(self.config.viewport, surface));
        self.exec_ctx.get_mut().windows = self.windows.clone();
        self
    }

    /// Run one command line outside any terminal and return its output.
    ///
    /// Calls share one context, so `cd` carries over. Detached tools are
    /// awaited in place.
    pub async fn execute(&self, line: &str) -> ExecResult {
        let mut ctx = self.exec_ctx.lock().await;
        ctx.history.push(line.to_string());
        self.interpreter.execute(line, &mut ctx).await.finish().await
    }

    /// Working directory of [`Kernel::execute`] calls.
    pub async fn cwd(&self) -> VfsPath {
        self.exec_ctx.lock().await.cwd.clone()
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn vfs(&self) -> &SharedVfs {
        &self.vfs
    }

    pub fn windows(&self) -> &SharedWindows {
        &self.windows
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.interpreter.tools()
    }

    fn tools_mut(&mut self) -> &mut ToolRegistry {
        Arc::make_mut(&mut self.interpreter).tools_mut()
    }

    /// Add a command, replacing any tool with the same name.
    ///
    /// Terminals opened afterwards see it.
    pub fn register_tool(&mut self, tool: impl Tool + 'static) {
        self.tools_mut().register(tool);
    }

    /// Add a command backed by a closure.
    pub fn register_fn<F>(&mut self, name: &str, description: &str, handler: F)
    where
        F: Fn(&ToolArgs, &mut ExecContext) -> ExecResult + Send + Sync + 'static,
    {
        self.tools_mut().register_fn(name, description, handler);
    }

    /// A fresh execution context for this kernel's user, starting at home.
    pub fn context(&self) -> ExecContext {
        let mut ctx = ExecContext::new(self.vfs.clone(), self.windows.clone(), self.config.identity())
            .with_http(Arc::clone(&self.http));
        ctx.started_at = self.started_at;
        ctx
    }

    /// Open the terminal window and start a session that prints to `sink`.
    ///
    /// The window is 700px by 500px at (200, 100) with a taskbar entry. If
    /// it is already open it is brought to front where it stands and the new
    /// session draws into it.
    /// Must be called inside a tokio runtime.
    pub fn open_terminal(&self, sink: impl OutputSink) -> Terminal {
        {
            let mut windows = self.windows.lock();
            let reopened = windows.contains(TERMINAL_WINDOW_ID);
            windows.create_window(
                TERMINAL_WINDOW_ID,
                "Terminal",
                Dimension::Px(700.0),
                Dimension::Px(500.0),
            );
            if !reopened {
                windows.move_window(TERMINAL_WINDOW_ID, 200, 100);
            }
            windows.add_to_taskbar(TERMINAL_WINDOW_ID, "Terminal", Some(TERMINAL_ICON));
        }

        let queue = PrintQueue::spawn(sink, self.config.type_delay());
        let terminal = Terminal::new(
            self.context(),
            Arc::clone(&self.interpreter),
            queue,
            TERMINAL_WINDOW_ID,
        );
        terminal.greet();
        terminal
    }
}
