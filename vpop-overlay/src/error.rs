//! Error types for vpop-overlay
//!
//! None of these reach the host page: the engine degrades every failure to
//! "no visual change" and logs it.

use thiserror::Error;

/// Main error type for vpop-overlay
#[derive(Error, Debug)]
pub enum Error {
    /// Errors from the shared crate (config files, I/O, parsing)
    #[error(transparent)]
    Common(#[from] vpop_common::Error),

    /// Configuration value out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event loop no longer running
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Convenience Result type using vpop-overlay Error
pub type Result<T> = std::result::Result<T, Error>;
