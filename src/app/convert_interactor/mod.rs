// Convert interactor - Orchestrates one render from the option records

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::TrimRules;
use crate::planner::{CommandBuilder, RenderPlan};
use crate::session::{EngineSession, RenderedOutput};

/// Result of a render that did not fail outright
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Output was produced and published on the session
    Completed(RenderedOutput),
    /// The engine ran but wrote nothing; the session is ready again
    NoOutput,
}

/// Interactor for the convert use case
pub struct ConvertInteractor {
    session: Arc<EngineSession>,
    input: InputOptions,
    output: OutputOptions,
    source_duration: Option<f64>,
}

impl ConvertInteractor {
    /// Create new convert interactor around a session
    pub fn new(session: Arc<EngineSession>, output: OutputOptions) -> Self {
        Self {
            session,
            input: InputOptions::default(),
            output,
            source_duration: None,
        }
    }

    pub fn session(&self) -> &Arc<EngineSession> {
        &self.session
    }

    pub fn input(&self) -> &InputOptions {
        &self.input
    }

    pub fn output(&self) -> &OutputOptions {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut OutputOptions {
        &mut self.output
    }

    pub fn source_duration(&self) -> Option<f64> {
        self.source_duration
    }

    /// Select a new source; the trim window starts out disabled
    pub fn select_file(&mut self, file: SourceFile, duration: Option<f64>) {
        info!("Selected source {} ({} bytes, {})", file.name, file.size, file.media_type);
        self.input = InputOptions::with_file(file);
        self.source_duration = duration;
    }

    pub fn enable_trim_start(&mut self) {
        TrimRules::enable_trim_start(&mut self.input);
    }

    pub fn enable_trim_end(&mut self) {
        TrimRules::enable_trim_end(&mut self.input, self.source_duration);
    }

    pub fn disable_trim_start(&mut self) {
        TrimRules::disable_trim_start(&mut self.input);
    }

    pub fn disable_trim_end(&mut self) {
        TrimRules::disable_trim_end(&mut self.input);
    }

    pub fn set_trim_start(&mut self, value: &str) -> Result<(), DomainError> {
        TrimRules::set_trim_start(&mut self.input, value)
    }

    pub fn set_trim_end(&mut self, value: &str) -> Result<(), DomainError> {
        TrimRules::set_trim_end(&mut self.input, value)
    }

    /// Range-slider positions of both bounds, once the source duration is known
    pub fn trim_positions(&self) -> Result<Option<(f64, f64)>, DomainError> {
        let Some(duration) = self.source_duration else {
            return Ok(None);
        };
        Ok(Some((
            TrimRules::start_position(&self.input)?,
            TrimRules::end_position(&self.input, duration)?,
        )))
    }

    /// Field texts of both bounds, defaulting to zero and the source duration
    pub fn trim_labels(&self) -> Option<(String, String)> {
        let duration = self.source_duration?;
        Some((
            TrimRules::start_display(&self.input),
            TrimRules::end_display(&self.input, duration),
        ))
    }

    /// Build the command for the current options without touching the engine
    pub fn plan(&self) -> Result<RenderPlan, DomainError> {
        CommandBuilder::build(&self.input, &self.output)
    }

    /// A source is selected and no render is in flight
    pub async fn can_start_render(&self) -> bool {
        self.input.file.is_some() && !self.session.is_busy()
    }

    /// Run one render end to end
    pub async fn start_render(&mut self) -> Result<RenderOutcome, DomainError> {
        let source = self
            .input
            .file
            .clone()
            .ok_or_else(|| DomainError::InvalidSessionState("No source file selected".to_string()))?;
        let plan = self.plan()?;

        self.session.ensure_loaded().await?;

        let rendered = self
            .session
            .render(source.bytes(), &source.name, &plan.args, &plan.output_file_name)
            .await;
        let bytes = match rendered {
            Ok(bytes) => bytes,
            Err(DomainError::NoOutputProduced(name)) => {
                warn!("Render finished without producing {}", name);
                return Ok(RenderOutcome::NoOutput);
            }
            Err(e) => return Err(e),
        };

        let output = RenderedOutput::new(
            plan.output_file_name.clone(),
            plan.output_mime.clone(),
            plan.container(),
            bytes,
        );
        info!(
            "Render completed: {} ({} bytes, {})",
            output.file_name, output.size, output.mime
        );
        self.session.publish_output(output.clone()).await;
        self.output = plan.resolved_output;
        Ok(RenderOutcome::Completed(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{EngineScript, ScriptedEngineFactory};
    use crate::session::{ResetPolicy, SessionPhase};
    use std::time::Duration;
    use tokio::sync::Semaphore;
    use tokio::time::timeout;

    fn interactor(script: EngineScript) -> (ConvertInteractor, Arc<ScriptedEngineFactory>) {
        let factory = Arc::new(ScriptedEngineFactory::new(script));
        let session = Arc::new(EngineSession::new(factory.clone(), ResetPolicy::Never));
        (ConvertInteractor::new(session, OutputOptions::default()), factory)
    }

    #[tokio::test]
    async fn test_render_without_file() {
        let (mut interactor, factory) = interactor(EngineScript::default());
        let result = interactor.start_render().await;
        assert!(matches!(result, Err(DomainError::InvalidSessionState(_))));
        assert_eq!(factory.instances_created(), 0);
        assert!(!interactor.can_start_render().await);
    }

    #[tokio::test]
    async fn test_invalid_options_fail_before_engine() {
        let (mut interactor, factory) = interactor(EngineScript::default());
        interactor.select_file(SourceFile::new("recording", vec![1u8; 4]), None);
        assert!(interactor.can_start_render().await);

        let result = interactor.start_render().await;
        assert_eq!(result, Err(DomainError::NoContainerSelected));
        assert_eq!(factory.instances_created(), 0);
        assert_eq!(interactor.session().phase().await, SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_completed_render_updates_output_options() {
        let (mut interactor, _factory) =
            interactor(EngineScript::default().with_output(b"GIF89a".to_vec()));
        interactor.select_file(SourceFile::new("clip.gif", vec![1u8; 8]), Some(12.0));

        let outcome = interactor.start_render().await.unwrap();
        match outcome {
            RenderOutcome::Completed(output) => {
                assert_eq!(output.file_name, "output.gif");
                assert_eq!(output.mime, "image/gif");
                assert_eq!(output.bytes, b"GIF89a".to_vec());
            }
            RenderOutcome::NoOutput => panic!("expected output"),
        }
        assert_eq!(interactor.output().container.as_deref(), Some("gif"));

        let snapshot = interactor.session().snapshot().await;
        assert_eq!(snapshot.phase, SessionPhase::Completed);
        assert_eq!(snapshot.output.map(|output| output.size), Some(6));
    }

    #[tokio::test]
    async fn test_empty_output_is_soft_failure() {
        let (mut interactor, _factory) =
            interactor(EngineScript::default().with_log_lines(["frame=0"]));
        interactor.select_file(SourceFile::new("clip.mp4", vec![1u8; 8]), None);
        interactor.output_mut().container = Some("webm".to_string());

        let outcome = interactor.start_render().await.unwrap();
        assert_eq!(outcome, RenderOutcome::NoOutput);
        assert_eq!(interactor.output().container.as_deref(), Some("webm"));

        let snapshot = interactor.session().snapshot().await;
        assert_eq!(snapshot.phase, SessionPhase::Ready);
        assert_eq!(snapshot.log, "frame=0");
        assert!(snapshot.output.is_none());
    }

    #[tokio::test]
    async fn test_trim_end_defaults_to_duration() {
        let (mut interactor, _factory) = interactor(EngineScript::default());
        interactor.select_file(SourceFile::new("clip.mp4", vec![1u8; 8]), Some(42.5));
        interactor.enable_trim_start();
        interactor.enable_trim_end();

        assert_eq!(interactor.input().trim_start.as_deref(), Some("0"));
        assert_eq!(interactor.input().trim_end.as_deref(), Some("42.5"));

        interactor.set_trim_start("50").unwrap();
        assert_eq!(interactor.input().trim_end.as_deref(), Some("50"));
        assert_eq!(interactor.trim_positions().unwrap(), Some((50.0, 50.0)));

        interactor.disable_trim_end();
        assert_eq!(interactor.trim_positions().unwrap(), Some((50.0, 42.5)));
    }

    #[tokio::test]
    async fn test_trim_labels_follow_fields() {
        let (mut interactor, _factory) = interactor(EngineScript::default());
        interactor.select_file(SourceFile::new("clip.mp4", vec![1u8; 8]), None);
        assert_eq!(interactor.trim_labels(), None);

        interactor.select_file(SourceFile::new("clip.mp4", vec![1u8; 8]), Some(95.5));
        assert_eq!(
            interactor.trim_labels(),
            Some(("0".to_string(), "95.5".to_string()))
        );

        interactor.set_trim_start("0:10").unwrap();
        interactor.set_trim_end("1:20").unwrap();
        assert_eq!(
            interactor.trim_labels(),
            Some(("0:10".to_string(), "1:20".to_string()))
        );
    }

    #[tokio::test]
    async fn test_rejected_start_keeps_running_log() {
        let gate = Arc::new(Semaphore::new(0));
        let script = EngineScript::default()
            .with_log_lines(["frame=1 encoding"])
            .with_output(b"GIF89a".to_vec())
            .with_gate(gate.clone());
        let (mut first, _factory) = interactor(script);
        first.select_file(SourceFile::new("clip.gif", vec![1u8; 8]), None);
        let session = first.session().clone();

        let running = tokio::spawn(async move { first.start_render().await });
        timeout(Duration::from_secs(5), async {
            while session.log().await.is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert!(session.is_busy());

        let mut second = ConvertInteractor::new(session.clone(), OutputOptions::default());
        second.select_file(SourceFile::new("other.gif", vec![2u8; 8]), None);
        assert!(!second.can_start_render().await);
        let result = second.start_render().await;
        assert!(matches!(result, Err(DomainError::InvalidSessionState(_))));
        assert_eq!(session.log().await, "frame=1 encoding");

        gate.add_permits(1);
        let outcome = running.await.unwrap().unwrap();
        assert!(matches!(outcome, RenderOutcome::Completed(_)));
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.log, "frame=1 encoding");
        assert_eq!(snapshot.output.map(|output| output.file_name).as_deref(), Some("output.gif"));
    }
}
