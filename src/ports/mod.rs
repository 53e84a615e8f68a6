// Ports - Interface definitions (contracts)

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::errors::*;

/// Event emitted by a transcoding engine while it works
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// One line of engine log output
    Log(String),
    /// Completed fraction of the current command, nominally in `[0, 1]`
    Progress(f64),
}

/// Sending half handed to an engine instance for its events
pub type EventSender = mpsc::UnboundedSender<EngineEvent>;

/// Receiving half drained by the session
pub type EventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

/// Port for one transcoding engine instance
///
/// An instance owns a private file namespace that lives as long as the
/// instance does.
#[async_trait]
pub trait TranscodeEngine: Send {
    /// Initialize the engine
    async fn load(&mut self) -> Result<(), DomainError>;

    /// Place a file into the engine's namespace
    async fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), DomainError>;

    /// Run one command
    async fn exec(&mut self, args: &[String]) -> Result<(), DomainError>;

    /// Read a file back from the engine's namespace
    async fn read_file(&mut self, name: &str) -> Result<Vec<u8>, DomainError>;
}

/// Creates fresh engine instances
pub trait EngineFactory: Send + Sync {
    /// New, unloaded instance reporting its events on `events`
    fn create(&self, events: EventSender) -> Box<dyn TranscodeEngine>;
}

/// Port for source media probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Duration of the media file in seconds
    async fn probe_duration(&self, file_path: &str) -> Result<f64, DomainError>;
}
