//! Where webdesk keeps its files on the host.
//!
//! The virtual filesystem is stored as one JSON blob per storage key under
//! [`paths::storage_dir`]; the kernel configuration is read from
//! [`paths::config_file`].

pub mod paths;
