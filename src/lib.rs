//! mediaconv library
//!
//! Converts and trims media files by driving a transcoding engine through an
//! owned, stateful session.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod planner;
pub mod ports;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use app::{ConvertInteractor, RenderOutcome};
pub use config::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{InputOptions, OutputOptions, SourceFile};
pub use error::ConvertError;
pub use planner::{CommandBuilder, RenderPlan};
pub use session::{EngineSession, ResetPolicy, SessionPhase};
