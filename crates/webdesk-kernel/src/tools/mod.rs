//! Tools: the commands a terminal can run.
//!
//! Every command, builtin or host-registered, implements [`Tool`] and lives
//! in a [`ToolRegistry`]. Tools receive their arguments already globbed and
//! split into flags and positionals, plus an [`ExecContext`] giving access to
//! the VFS, the window manager and session state.

pub mod builtin;
mod context;
mod registry;
mod traits;

pub use builtin::register_builtins;
pub use context::{CommandInfo, ExecContext, Identity};
pub use registry::ToolRegistry;
pub use traits::{FnTool, Tool, ToolArgs};
