//! Error handling module for mediaconv

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for mediaconv operations
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Output file write error
    #[error("Failed to write output file: {message}")]
    OutputError { message: String },

    /// Configuration file error
    #[error("Failed to load configuration: {message}")]
    ConfigError { message: String },

    /// Domain error
    #[error(transparent)]
    Domain(#[from] DomainError),
}
