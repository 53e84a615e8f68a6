//! Session manager owning the transcoding engine instance

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::ports::{EngineEvent, EngineFactory, EventReceiver, TranscodeEngine};
use crate::session::{RenderedOutput, ResetPolicy, SessionPhase, SessionSnapshot};

/// Live engine instance together with its event stream
struct EngineSlot {
    engine: Box<dyn TranscodeEngine>,
    events: EventReceiver,
}

struct SessionState {
    phase: SessionPhase,
    engine_loaded: bool,
    log: String,
    progress: Option<f64>,
    output: Option<RenderedOutput>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            engine_loaded: false,
            log: String::new(),
            progress: None,
            output: None,
        }
    }
}

/// One logical session around a single transcoding engine instance
///
/// Lock order is `slot` before `state`. The slot is held for the whole of a
/// load or render and is only ever taken with `try_lock`, so a free slot means
/// no engine call is in flight. The state is only locked briefly.
pub struct EngineSession {
    factory: Arc<dyn EngineFactory>,
    reset_policy: ResetPolicy,
    state: Mutex<SessionState>,
    slot: Mutex<Option<EngineSlot>>,
    progress_tx: watch::Sender<Option<f64>>,
}

impl EngineSession {
    pub fn new(factory: Arc<dyn EngineFactory>, reset_policy: ResetPolicy) -> Self {
        let (progress_tx, _) = watch::channel(None);
        Self {
            factory,
            reset_policy,
            state: Mutex::new(SessionState::new()),
            slot: Mutex::new(None),
            progress_tx,
        }
    }

    /// Whether a load or render is running right now
    ///
    /// Unlike `phase()`, this stays accurate when a caller dropped a render
    /// future before it finished.
    pub fn is_busy(&self) -> bool {
        self.slot.try_lock().is_err()
    }

    /// Load the engine if it is not loaded yet
    pub async fn ensure_loaded(&self) -> Result<(), DomainError> {
        let mut slot = self.acquire_slot("load the engine").await?;
        {
            let mut state = self.state.lock().await;
            if state.phase.is_busy() {
                warn!("Previous {} was interrupted, discarding the engine", state.phase);
                Self::discard(&mut slot, &mut state);
                self.progress_tx.send_replace(None);
            }
            match state.phase {
                SessionPhase::Ready if slot.is_some() => return Ok(()),
                SessionPhase::Completed | SessionPhase::Failed
                    if state.engine_loaded && slot.is_some() =>
                {
                    state.phase = SessionPhase::Ready;
                    return Ok(());
                }
                _ => state.phase = SessionPhase::Loading,
            }
        }

        info!("Loading transcoding engine");
        let EngineSlot { engine, events } = slot.get_or_insert_with(|| self.create_slot());
        let result = self
            .drive(events, engine.load())
            .await
            .map_err(into_load_failure);

        let mut state = self.state.lock().await;
        match &result {
            Ok(()) => {
                state.phase = SessionPhase::Ready;
                state.engine_loaded = true;
                info!("Transcoding engine ready");
            }
            Err(e) => {
                *slot = None;
                state.phase = SessionPhase::Failed;
                state.engine_loaded = false;
                warn!("{}", e);
            }
        }
        result
    }

    /// Run one command against the loaded engine and return the output bytes
    ///
    /// The log and the previous output are cleared when the render starts.
    pub async fn render(
        &self,
        source_bytes: &[u8],
        source_name: &str,
        args: &[String],
        output_file_name: &str,
    ) -> Result<Vec<u8>, DomainError> {
        let mut slot = self.acquire_slot("start a render").await?;
        {
            let mut state = self.state.lock().await;
            if state.phase != SessionPhase::Ready || slot.is_none() {
                return Err(DomainError::InvalidSessionState(format!(
                    "Render requires a ready engine, session is {}",
                    state.phase
                )));
            }
            state.log.clear();
            state.output = None;
            state.phase = SessionPhase::Executing;
            state.progress = Some(0.0);
            self.progress_tx.send_replace(Some(0.0));
        }

        info!("Rendering {} -> {}", source_name, output_file_name);
        let result = match slot.as_mut() {
            Some(EngineSlot { engine, events }) => {
                self.run_command(
                    &mut **engine,
                    events,
                    source_bytes,
                    source_name,
                    args,
                    output_file_name,
                )
                .await
            }
            None => Err(DomainError::InvalidSessionState(
                "No engine instance is loaded".to_string(),
            )),
        };

        let mut state = self.state.lock().await;
        state.progress = None;
        self.progress_tx.send_replace(None);

        let result = match result {
            Ok(bytes) if bytes.is_empty() => {
                warn!("Engine produced no data for {}", output_file_name);
                state.phase = SessionPhase::Ready;
                Err(DomainError::NoOutputProduced(output_file_name.to_string()))
            }
            Ok(bytes) => {
                info!("Render completed: {} bytes", bytes.len());
                state.phase = SessionPhase::Completed;
                Ok(bytes)
            }
            Err(e) => {
                warn!("Render failed: {}", e);
                state.phase = SessionPhase::Failed;
                Err(e)
            }
        };

        if self.reset_policy.requires_reset(state.phase) {
            debug!("Reset policy {} discards the engine", self.reset_policy);
            Self::discard(&mut slot, &mut state);
        }

        result
    }

    /// Discard the engine instance; the next `ensure_loaded` creates a fresh one
    ///
    /// A phase left busy by an abandoned load or render does not block this.
    pub async fn reset(&self) -> Result<(), DomainError> {
        let mut slot = self.acquire_slot("reset").await?;
        let mut state = self.state.lock().await;
        if state.phase.is_busy() {
            warn!("Discarding the engine after an interrupted {}", state.phase);
        }

        Self::discard(&mut slot, &mut state);
        self.progress_tx.send_replace(None);
        info!("Engine session reset");
        Ok(())
    }

    /// Start a fresh log and drop the previous output
    pub async fn clear(&self) -> Result<(), DomainError> {
        let _slot = self.acquire_slot("clear the log").await?;
        let mut state = self.state.lock().await;
        state.log.clear();
        state.output = None;
        Ok(())
    }

    /// Publish the output of a completed render
    pub async fn publish_output(&self, output: RenderedOutput) {
        self.state.lock().await.output = Some(output);
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase
    }

    pub async fn log(&self) -> String {
        self.state.lock().await.log.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            phase: state.phase,
            engine_loaded: state.engine_loaded,
            log: state.log.clone(),
            progress: state.progress,
            output: state.output.clone(),
        }
    }

    /// Latest progress percentage, `None` while not rendering
    pub fn subscribe_progress(&self) -> watch::Receiver<Option<f64>> {
        self.progress_tx.subscribe()
    }

    fn create_slot(&self) -> EngineSlot {
        let (tx, events) = mpsc::unbounded_channel();
        debug!("Creating engine instance");
        EngineSlot {
            engine: self.factory.create(tx),
            events,
        }
    }

    /// Take the engine slot, refusing instead of queueing behind a running call
    async fn acquire_slot(
        &self,
        action: &str,
    ) -> Result<MutexGuard<'_, Option<EngineSlot>>, DomainError> {
        match self.slot.try_lock() {
            Ok(slot) => Ok(slot),
            Err(_) => {
                let phase = self.state.lock().await.phase;
                Err(DomainError::InvalidSessionState(format!(
                    "Cannot {} while the session is {}",
                    action, phase
                )))
            }
        }
    }

    fn discard(slot: &mut Option<EngineSlot>, state: &mut SessionState) {
        *slot = None;
        state.engine_loaded = false;
        state.phase = SessionPhase::Idle;
        state.progress = None;
    }

    async fn run_command(
        &self,
        engine: &mut dyn TranscodeEngine,
        events: &mut EventReceiver,
        source_bytes: &[u8],
        source_name: &str,
        args: &[String],
        output_file_name: &str,
    ) -> Result<Vec<u8>, DomainError> {
        self.drive(events, engine.write_file(source_name, source_bytes))
            .await
            .map_err(into_execution_failure)?;
        self.drive(events, engine.exec(args))
            .await
            .map_err(into_execution_failure)?;
        self.drive(events, engine.read_file(output_file_name))
            .await
            .map_err(into_execution_failure)
    }

    /// Await an engine call while folding its events into the session state
    async fn drive<T>(
        &self,
        events: &mut EventReceiver,
        operation: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::pin!(operation);
        loop {
            tokio::select! {
                biased;
                Some(event) = events.recv() => self.apply_event(event).await,
                result = &mut operation => {
                    while let Ok(event) = events.try_recv() {
                        self.apply_event(event).await;
                    }
                    return result;
                }
            }
        }
    }

    async fn apply_event(&self, event: EngineEvent) {
        let mut state = self.state.lock().await;
        match event {
            EngineEvent::Log(line) => {
                debug!(target: "engine", "{}", line);
                if !state.log.is_empty() {
                    state.log.push('\n');
                }
                state.log.push_str(&line);
            }
            EngineEvent::Progress(fraction) => {
                let percent = fraction * 100.0;
                state.progress = Some(percent);
                self.progress_tx.send_replace(Some(percent));
            }
        }
    }
}

fn into_load_failure(err: DomainError) -> DomainError {
    match err {
        DomainError::EngineLoadFailure(_) => err,
        other => DomainError::EngineLoadFailure(other.to_string()),
    }
}

fn into_execution_failure(err: DomainError) -> DomainError {
    match err {
        DomainError::EngineExecutionFailure(_) => err,
        other => DomainError::EngineExecutionFailure(other.to_string()),
    }
}
