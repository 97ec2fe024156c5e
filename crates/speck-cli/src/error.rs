//! Error types for speck-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from speck-core
    #[error(transparent)]
    Core(#[from] speck_core::Error),

    /// Error from speck-fs
    #[error(transparent)]
    Fs(#[from] speck_fs::Error),

    /// Error from speck-release
    #[error(transparent)]
    Release(#[from] speck_release::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
