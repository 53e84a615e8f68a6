// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Time string could not be parsed
    #[error("Invalid time format: {0}. Expected SS, MM:SS or HH:MM:SS")]
    InvalidFormat(String),

    /// No explicit container and none derivable from the source name
    #[error("No container selected")]
    NoContainerSelected,

    /// Container has no entry in the MIME table
    #[error("Unknown container: {0}")]
    UnknownContainer(String),

    /// Engine initialization failed
    #[error("Failed to load transcoding engine: {0}")]
    EngineLoadFailure(String),

    /// Engine rejected or failed the command
    #[error("Transcoding engine failed: {0}")]
    EngineExecutionFailure(String),

    /// Engine finished but the output file was empty
    #[error("No output produced: {0}")]
    NoOutputProduced(String),

    /// Operation is not allowed in the current session phase
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),

    /// File system failure outside the engine
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl DomainError {
    /// Whether the error blocks a render before the engine is touched
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidFormat(_)
                | DomainError::NoContainerSelected
                | DomainError::UnknownContainer(_)
        )
    }
}
