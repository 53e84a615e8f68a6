//! FFmpeg execution adapter
//!
//! Drives an `ffmpeg` executable. Each engine instance owns a scratch
//! directory that stands in for the engine's private file namespace and is
//! removed when the instance is dropped.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::ports::*;

pub mod progress;

pub use progress::ProgressEstimator;

/// Options placed ahead of every command
const GLOBAL_ARGS: &[&str] = &[
    "-hide_banner",
    "-nostdin",
    "-nostats",
    "-y",
    "-progress",
    "pipe:1",
];

/// Factory for process-backed engine instances
#[derive(Debug, Clone)]
pub struct FfmpegEngineFactory {
    ffmpeg_path: PathBuf,
}

impl FfmpegEngineFactory {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl EngineFactory for FfmpegEngineFactory {
    fn create(&self, events: EventSender) -> Box<dyn TranscodeEngine> {
        Box::new(FfmpegEngine::new(self.ffmpeg_path.clone(), events))
    }
}

/// One ffmpeg-backed engine instance
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
    events: EventSender,
    scratch: Option<TempDir>,
}

impl FfmpegEngine {
    pub fn new(ffmpeg_path: PathBuf, events: EventSender) -> Self {
        Self {
            ffmpeg_path,
            events,
            scratch: None,
        }
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    fn scratch_dir(&self) -> Result<&Path, DomainError> {
        self.scratch
            .as_ref()
            .map(TempDir::path)
            .ok_or_else(|| DomainError::EngineExecutionFailure("Engine is not loaded".to_string()))
    }

    /// Resolve a bare file name inside the scratch directory
    fn scratch_path(&self, name: &str) -> Result<PathBuf, DomainError> {
        let is_bare_name = Path::new(name)
            .file_name()
            .map_or(false, |file_name| file_name == name);
        if !is_bare_name {
            return Err(DomainError::EngineExecutionFailure(format!(
                "Invalid engine file name: {}",
                name
            )));
        }
        Ok(self.scratch_dir()?.join(name))
    }
}

#[async_trait]
impl TranscodeEngine for FfmpegEngine {
    async fn load(&mut self) -> Result<(), DomainError> {
        if self.scratch.is_some() {
            return Ok(());
        }

        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::EngineLoadFailure(format!(
                    "Cannot run {}: {}",
                    self.ffmpeg_path.display(),
                    e
                ))
            })?;
        if !output.status.success() {
            return Err(DomainError::EngineLoadFailure(format!(
                "{} -version exited with {}",
                self.ffmpeg_path.display(),
                output.status
            )));
        }

        let banner = String::from_utf8_lossy(&output.stdout);
        if let Some(version) = banner.lines().next() {
            self.emit(EngineEvent::Log(version.to_string()));
        }

        let scratch = tempfile::Builder::new()
            .prefix("mediaconv-")
            .tempdir()
            .map_err(|e| DomainError::EngineLoadFailure(format!("Cannot create scratch directory: {}", e)))?;
        debug!("Engine scratch directory: {}", scratch.path().display());
        self.scratch = Some(scratch);
        Ok(())
    }

    async fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self.scratch_path(name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::EngineExecutionFailure(format!("Cannot write {}: {}", name, e)))
    }

    async fn exec(&mut self, args: &[String]) -> Result<(), DomainError> {
        let scratch = self.scratch_dir()?.to_path_buf();
        info!("Running {} {}", self.ffmpeg_path.display(), args.join(" "));

        let mut child = Command::new(&self.ffmpeg_path)
            .args(GLOBAL_ARGS)
            .args(args)
            .current_dir(&scratch)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DomainError::EngineExecutionFailure(format!("Failed to spawn ffmpeg: {}", e)))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            DomainError::EngineExecutionFailure("ffmpeg stdout was not captured".to_string())
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            DomainError::EngineExecutionFailure("ffmpeg stderr was not captured".to_string())
        })?;

        let mut progress_lines = BufReader::new(stdout).lines();
        let mut log_lines = BufReader::new(stderr).lines();
        let mut estimator = ProgressEstimator::from_args(args);
        let (mut progress_done, mut log_done) = (false, false);

        // Both pipes are drained together so neither can fill up and stall ffmpeg
        while !(progress_done && log_done) {
            tokio::select! {
                line = progress_lines.next_line(), if !progress_done => match line {
                    Ok(Some(line)) => {
                        if let Some(fraction) = estimator.observe_progress_line(&line) {
                            self.emit(EngineEvent::Progress(fraction));
                        }
                    }
                    _ => progress_done = true,
                },
                line = log_lines.next_line(), if !log_done => match line {
                    Ok(Some(line)) => {
                        estimator.observe_log_line(&line);
                        self.emit(EngineEvent::Log(line));
                    }
                    _ => log_done = true,
                },
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DomainError::EngineExecutionFailure(format!("Failed to wait for ffmpeg: {}", e)))?;
        if !status.success() {
            return Err(DomainError::EngineExecutionFailure(format!(
                "ffmpeg exited with {}",
                status
            )));
        }
        Ok(())
    }

    async fn read_file(&mut self, name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.scratch_path(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(DomainError::EngineExecutionFailure(format!(
                "Cannot read {}: {}",
                name, e
            ))),
        }
    }
}
