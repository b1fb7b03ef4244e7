//! Virtual Filesystem (VFS) for webdesk.
//!
//! The VFS is a single owned tree rooted at a [`Folder`]:
//!
//! ```text
//! /                          # root folder
//! └── home/
//!     └── <user>/
//!         ├── Documents/     # INFO.txt
//!         ├── Pictures/      # default wallpapers
//!         ├── Music/
//!         └── Games/
//! ```
//!
//! # Design
//!
//! Every mutation rewrites the whole tree into a [`Storage`] medium under one
//! key before returning. On load the stored tree is deep-merged with the
//! default tree: keys missing from storage are added, stored values always win.

mod defaults;
mod error;
mod fs;
mod node;
mod path;
mod storage;

pub use defaults::{default_tree, merge_defaults, DEFAULT_WALLPAPER_COUNT};
pub use error::VfsError;
pub use fs::{NodeRef, SharedVfs, VirtualFs};
pub use node::{FileKind, FileNode, Folder, Node, FILE_ICON, NOTEPAD_ICON};
pub use path::VfsPath;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
