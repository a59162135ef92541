//! Error types for ccmonitor-core
//!
//! Most of the pipeline is infallible by construction: malformed log lines,
//! missing VCS metadata and unreadable files are ordinary outcomes, not errors.
//! Only configuration, logging setup and log discovery surface failures here.

use thiserror::Error;

/// Main error type for the ccmonitor-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Log file discovery error (bad glob pattern, unusable root)
    #[error("log discovery error: {0}")]
    Discovery(String),
}

/// Result type alias for ccmonitor-core
pub type Result<T> = std::result::Result<T, Error>;
