//! Error types for the gesture control library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Hand observation did not carry a usable landmark set
    #[error("Malformed observation: {0}")]
    MalformedObservation(String),

    /// Landmark source could not be started (permission denied, library missing)
    #[error("Landmark source unavailable: {0}")]
    SourceUnavailable(String),

    /// Landmark source failed for a single frame
    #[error("Landmark frame error: {0}")]
    SourceFrame(String),

    /// Filter initialization or processing error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
