//! Engine session: lifecycle of one transcoding engine instance plus its
//! accumulated log, progress and last output

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub mod manager;

pub use manager::EngineSession;

/// Session lifecycle phase
///
/// `Idle → Loading → Ready → Executing → {Completed, Failed}`; a reset
/// returns to `Idle`, and a loaded engine goes from `Completed`/`Failed`
/// straight back to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Loading,
    Ready,
    Executing,
    Completed,
    Failed,
}

impl SessionPhase {
    /// Whether an engine operation is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionPhase::Loading | SessionPhase::Executing)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Loading => "loading",
            SessionPhase::Ready => "ready",
            SessionPhase::Executing => "executing",
            SessionPhase::Completed => "completed",
            SessionPhase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// When the engine instance is thrown away after a render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetPolicy {
    /// Keep one instance for the whole session
    Never,
    /// Fresh instance for every render
    AfterEveryRender,
    /// Fresh instance only after a failed render
    #[default]
    AfterFailure,
}

impl ResetPolicy {
    /// Whether a render ending in `phase` requires a reset
    pub fn requires_reset(&self, phase: SessionPhase) -> bool {
        match self {
            ResetPolicy::Never => false,
            ResetPolicy::AfterEveryRender => true,
            ResetPolicy::AfterFailure => phase == SessionPhase::Failed,
        }
    }
}

impl FromStr for ResetPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" => Ok(ResetPolicy::Never),
            "after-every-render" | "always" => Ok(ResetPolicy::AfterEveryRender),
            "after-failure" => Ok(ResetPolicy::AfterFailure),
            _ => Err(DomainError::Config(format!(
                "Invalid reset policy: {}. Valid policies: never, after-every-render, after-failure",
                s
            ))),
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResetPolicy::Never => "never",
            ResetPolicy::AfterEveryRender => "after-every-render",
            ResetPolicy::AfterFailure => "after-failure",
        };
        write!(f, "{}", name)
    }
}

/// Output of a completed render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedOutput {
    pub file_name: String,
    pub mime: String,
    /// Container the output was actually produced in
    pub container: String,
    pub size: usize,
    pub finished_at: DateTime<Utc>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl RenderedOutput {
    pub fn new(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        container: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            container: container.into(),
            size: bytes.len(),
            finished_at: Utc::now(),
            bytes,
        }
    }
}

/// Point-in-time view of a session for display
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub engine_loaded: bool,
    pub log: String,
    /// Percentage in `[0, 100]`, `None` while not rendering
    pub progress: Option<f64>,
    pub output: Option<RenderedOutput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_policy_parse() {
        assert_eq!("never".parse::<ResetPolicy>().unwrap(), ResetPolicy::Never);
        assert_eq!(
            "After-Every-Render".parse::<ResetPolicy>().unwrap(),
            ResetPolicy::AfterEveryRender
        );
        assert_eq!(
            "after-failure".parse::<ResetPolicy>().unwrap(),
            ResetPolicy::AfterFailure
        );
        assert!("sometimes".parse::<ResetPolicy>().is_err());
        assert_eq!(ResetPolicy::default(), ResetPolicy::AfterFailure);
    }

    #[test]
    fn test_reset_policy_decisions() {
        assert!(!ResetPolicy::Never.requires_reset(SessionPhase::Failed));
        assert!(ResetPolicy::AfterEveryRender.requires_reset(SessionPhase::Completed));
        assert!(ResetPolicy::AfterEveryRender.requires_reset(SessionPhase::Ready));
        assert!(ResetPolicy::AfterFailure.requires_reset(SessionPhase::Failed));
        assert!(!ResetPolicy::AfterFailure.requires_reset(SessionPhase::Completed));
    }

    #[test]
    fn test_reset_policy_display_round_trip() {
        for policy in [
            ResetPolicy::Never,
            ResetPolicy::AfterEveryRender,
            ResetPolicy::AfterFailure,
        ] {
            assert_eq!(policy.to_string().parse::<ResetPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_busy_phases() {
        assert!(SessionPhase::Loading.is_busy());
        assert!(SessionPhase::Executing.is_busy());
        assert!(!SessionPhase::Completed.is_busy());
    }

    #[test]
    fn test_rendered_output_size() {
        let output = RenderedOutput::new("output.gif", "image/gif", "gif", vec![1, 2, 3]);
        assert_eq!(output.size, 3);
        assert_eq!(output.container, "gif");
    }
}
