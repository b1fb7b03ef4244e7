//! VFS error taxonomy.

use super::storage::StorageError;

/// Failure of a VFS operation.
///
/// Terminal tools turn these into one-line shell diagnostics; they never end
/// a session.
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    /// A path segment does not exist.
    #[error("{0}: No such file or directory")]
    InvalidPath(String),

    /// A path walked through a file.
    #[error("{0}: Not a directory")]
    NotADirectory(String),

    /// Creation collided with an existing entry.
    #[error("{0}: File exists")]
    AlreadyExists(String),

    /// A folder would become its own descendant.
    #[error("{0}: cannot move a directory into itself")]
    IntoItself(String),

    /// Names must be non-empty and free of `/`.
    #[error("'{0}': invalid name")]
    InvalidName(String),

    /// The stored blob could not be parsed.
    #[error("stored tree under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl VfsError {
    /// Short shell-style reason, without the offending name.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) => "No such file or directory",
            Self::NotADirectory(_) => "Not a directory",
            Self::AlreadyExists(_) => "File exists",
            Self::InvalidName(_) => "Invalid argument",
            Self::IntoItself(_) => "Cannot move a directory into itself",
            Self::Corrupt { .. } => "Corrupt storage",
            Self::Storage(_) => "Input/output error",
        }
    }
}
