//! webdesk-kernel: the core of the webdesk desktop shell.
//!
//! This crate provides:
//!
//! - **VFS**: a persisted, hierarchical tree of folders and files, merged
//!   with a default tree on every load
//! - **Window manager**: an in-memory registry of windows, z-order, taskbar
//!   entries and fullscreen state, with rendering behind [`window::WindowSurface`]
//! - **Interpreter**: a tokenizer, glob expander and pipeline runner over a
//!   registrable table of builtin tools
//! - **Terminal**: one interactive session (cwd, history, tab completion)
//!   whose output goes through a single FIFO print queue

pub mod interpreter;
pub mod kernel;
pub mod net;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod terminal;
pub mod tools;
pub mod vfs;
pub mod window;

pub use kernel::{ConfigError, Kernel, KernelConfig};
pub use terminal::{Key, KeyOutcome, Terminal};
