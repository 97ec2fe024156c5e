//! Filesystem abstraction for Speck
//!
//! Provides slash-normalized relative paths, atomic I/O, the
//! [`FileSystem`] collaborator used by the sync engine, and
//! format-agnostic configuration loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod filesystem;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::SpeckPath;
pub use error::{Error, Result};
pub use filesystem::{FileSystem, LocalFs};
pub use path::NormalizedPath;
