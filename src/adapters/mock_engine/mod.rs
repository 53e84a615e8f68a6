// Scripted engine adapter - deterministic stand-in for the transcoding engine

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use crate::domain::errors::*;
use crate::ports::*;

/// Behaviour every instance created by a [`ScriptedEngineFactory`] follows
#[derive(Debug, Clone, Default)]
pub struct EngineScript {
    load_error: Option<String>,
    exec_error: Option<String>,
    log_lines: Vec<String>,
    progress: Vec<f64>,
    output: Vec<u8>,
    gate: Option<Arc<Semaphore>>,
}

impl EngineScript {
    /// Fail every `load` with this message
    pub fn with_load_error(mut self, message: impl Into<String>) -> Self {
        self.load_error = Some(message.into());
        self
    }

    /// Fail every `exec` with this message (after emitting the log lines)
    pub fn with_exec_error(mut self, message: impl Into<String>) -> Self {
        self.exec_error = Some(message.into());
        self
    }

    /// Log lines emitted by `exec`
    pub fn with_log_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Progress fractions emitted by `exec`, in order
    pub fn with_progress(mut self, fractions: impl IntoIterator<Item = f64>) -> Self {
        self.progress = fractions.into_iter().collect();
        self
    }

    /// Bytes `exec` writes to the output file (last argument)
    pub fn with_output(mut self, bytes: Vec<u8>) -> Self {
        self.output = bytes;
        self
    }

    /// Block `exec` after its log and progress events until a permit is added to `gate`
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[derive(Default)]
struct Journal {
    instances: AtomicUsize,
    loads: AtomicUsize,
    commands: Mutex<Vec<Vec<String>>>,
}

/// Factory producing [`ScriptedEngine`] instances
pub struct ScriptedEngineFactory {
    script: Arc<EngineScript>,
    journal: Arc<Journal>,
}

impl ScriptedEngineFactory {
    pub fn new(script: EngineScript) -> Self {
        Self {
            script: Arc::new(script),
            journal: Arc::new(Journal::default()),
        }
    }

    /// Number of engine instances created so far
    pub fn instances_created(&self) -> usize {
        self.journal.instances.load(Ordering::SeqCst)
    }

    /// Number of `load` calls across all instances
    pub fn load_calls(&self) -> usize {
        self.journal.loads.load(Ordering::SeqCst)
    }

    /// Every argument vector passed to `exec`, oldest first
    pub async fn executed_commands(&self) -> Vec<Vec<String>> {
        self.journal.commands.lock().await.clone()
    }
}

impl EngineFactory for ScriptedEngineFactory {
    fn create(&self, events: EventSender) -> Box<dyn TranscodeEngine> {
        self.journal.instances.fetch_add(1, Ordering::SeqCst);
        Box::new(ScriptedEngine {
            script: Arc::clone(&self.script),
            journal: Arc::clone(&self.journal),
            events,
            files: HashMap::new(),
            loaded: false,
        })
    }
}

/// Engine instance replaying an [`EngineScript`] over an in-memory file map
pub struct ScriptedEngine {
    script: Arc<EngineScript>,
    journal: Arc<Journal>,
    events: EventSender,
    files: HashMap<String, Vec<u8>>,
    loaded: bool,
}

impl ScriptedEngine {
    fn emit(&self, event: EngineEvent) {
        // The session may already be gone; events are best effort
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl TranscodeEngine for ScriptedEngine {
    async fn load(&mut self) -> Result<(), DomainError> {
        self.journal.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.script.load_error {
            return Err(DomainError::EngineLoadFailure(message.clone()));
        }
        self.loaded = true;
        Ok(())
    }

    async fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        self.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn exec(&mut self, args: &[String]) -> Result<(), DomainError> {
        if !self.loaded {
            return Err(DomainError::EngineExecutionFailure(
                "Engine is not loaded".to_string(),
            ));
        }
        self.journal.commands.lock().await.push(args.to_vec());

        for line in &self.script.log_lines {
            self.emit(EngineEvent::Log(line.clone()));
        }
        for fraction in &self.script.progress {
            self.emit(EngineEvent::Progress(*fraction));
        }

        if let Some(gate) = &self.script.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| DomainError::EngineExecutionFailure(e.to_string()))?;
            permit.forget();
        }

        if let Some(message) = &self.script.exec_error {
            return Err(DomainError::EngineExecutionFailure(message.clone()));
        }

        let input = args
            .iter()
            .position(|arg| arg == "-i")
            .and_then(|index| args.get(index + 1));
        if let Some(input) = input {
            if !self.files.contains_key(input) {
                return Err(DomainError::EngineExecutionFailure(format!(
                    "{}: No such file or directory",
                    input
                )));
            }
        }

        if let Some(output) = args.last() {
            self.files.insert(output.clone(), self.script.output.clone());
        }
        Ok(())
    }

    async fn read_file(&mut self, name: &str) -> Result<Vec<u8>, DomainError> {
        Ok(self.files.get(name).cloned().unwrap_or_default())
    }
}
