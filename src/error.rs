//! Error handling and custom error types
//!
//! Validation failures, linkage failures and platform conversion failures are
//! kept as distinct variants so callers can tell a malformed request apart
//! from an image the platform could not process.

use thiserror::Error;

/// A conversion request rejected before any platform call was made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Incorrect inputPath, received: {0}")]
    InputPath(String),

    #[error("Incorrect outputPath, received: {0}")]
    OutputPath(String),

    #[error("Incorrect config, received: {0}")]
    Config(String),

    #[error("Incorrect config.type, received: {0}")]
    Type(String),

    #[error("Incorrect config.quality, received: {0}")]
    Quality(String),

    #[error("Incorrect config.preset, received: {0}")]
    Preset(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Linking(String),

    /// Platform failure, displayed exactly as the platform reported it.
    #[error("{0}")]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
