// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod mock_engine;
pub mod probe_ffprobe;

// Re-export adapters
pub use exec_ffmpeg::{FfmpegEngine, FfmpegEngineFactory};
pub use mock_engine::{EngineScript, ScriptedEngine, ScriptedEngineFactory};
pub use probe_ffprobe::FfprobeAdapter;
