//! XDG Base Directory paths for webdesk state.
//!
//! | Purpose | XDG Variable | Default | webdesk Path |
//! |---------|--------------|---------|--------------|
//! | VFS blobs | `$XDG_DATA_HOME` | `~/.local/share` | `$XDG_DATA_HOME/webdesk/storage/*.json` |
//! | Config | `$XDG_CONFIG_HOME` | `~/.config` | `$XDG_CONFIG_HOME/webdesk/config.toml` |

use std::path::PathBuf;

use directories::BaseDirs;

const APP_DIR: &str = "webdesk";

/// Get the data directory for persistent state.
///
/// Uses `$XDG_DATA_HOME/webdesk` or falls back to `~/.local/share/webdesk`.
pub fn data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| home_fallback().join(".local").join("share"))
        .join(APP_DIR)
}

/// Get the config directory.
///
/// Uses `$XDG_CONFIG_HOME/webdesk` or falls back to `~/.config/webdesk`.
pub fn config_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| home_fallback().join(".config"))
        .join(APP_DIR)
}

/// Directory holding one JSON blob per VFS storage key.
pub fn storage_dir() -> PathBuf {
    data_dir().join("storage")
}

/// The kernel configuration file.
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Home directory when BaseDirs cannot determine one.
fn home_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
