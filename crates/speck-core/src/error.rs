//! Error types for speck-core

use std::path::PathBuf;

/// Result type for speck-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole operation.
///
/// Per-file failures during a sync never surface here; they are captured
/// into [`SyncOutcome::errors`](crate::SyncOutcome::errors).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The extracted release tree is missing
    #[error("Release tree not found at {path}")]
    SourceMissing { path: PathBuf },

    /// Two rules claim overlapping paths
    #[error("Rule conflict: '{first}' overlaps '{second}'")]
    RuleConflict { first: String, second: String },

    /// An ignore pattern could not be compiled
    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Filesystem error from speck-fs
    #[error(transparent)]
    Fs(#[from] speck_fs::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_missing_displays_path() {
        let err = Error::SourceMissing {
            path: PathBuf::from("/tmp/speck-v1.2.0"),
        };
        assert!(err.to_string().contains("/tmp/speck-v1.2.0"));
    }

    #[test]
    fn fs_errors_are_transparent() {
        let inner = speck_fs::Error::InvalidUtf8 {
            path: PathBuf::from("AGENTS.md"),
        };
        let expected = inner.to_string();
        let err: Error = inner.into();
        assert_eq!(err.to_string(), expected);
    }
}
