// Domain models - Core types and data structures

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Broad media category of a file, derived from its MIME type prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
    Audio,
    Other,
}

impl MediaKind {
    /// Classify a MIME type such as `video/mp4`
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video/") {
            MediaKind::Video
        } else if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("audio/") {
            MediaKind::Audio
        } else {
            MediaKind::Other
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Source media selected by the user
#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    /// File name as written into the engine (no directory part)
    pub name: String,
    /// Byte length
    pub size: u64,
    /// Declared MIME type
    pub media_type: String,
    #[serde(skip)]
    bytes: Arc<[u8]>,
}

impl SourceFile {
    /// Create a source from in-memory bytes, guessing the MIME type from the name
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let media_type = guess_media_type(&name).to_string();
        Self::with_media_type(name, media_type, bytes)
    }

    /// Create a source with an explicit MIME type
    pub fn with_media_type(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a source from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| DomainError::Io(format!("Not a file path: {}", path.display())))?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }

    /// Raw file contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Media category from the MIME prefix
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.media_type)
    }

    /// Text after the last `.` of the name, if any
    pub fn extension(&self) -> Option<&str> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

/// Guess a MIME type from a file name's extension
pub fn guess_media_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Input side of a conversion: the source and its optional trim window
#[derive(Debug, Clone, Default, Serialize)]
pub struct InputOptions {
    pub file: Option<SourceFile>,
    /// Trim start (`-ss`), as typed by the user
    pub trim_start: Option<String>,
    /// Trim end (`-to`), as typed by the user
    pub trim_end: Option<String>,
}

impl InputOptions {
    pub fn with_file(file: SourceFile) -> Self {
        Self {
            file: Some(file),
            ..Self::default()
        }
    }
}

/// Output side of a conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framerate: Option<u32>,
    /// Palette-based GIF encoding; only read for `gif`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hq_gif: Option<bool>,
    /// Infinite looping; only read for `webp`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_output: Option<bool>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            container: None,
            pixel_format: None,
            framerate: None,
            hq_gif: Some(true),
            loop_output: Some(true),
        }
    }
}

impl OutputOptions {
    /// Options with every field unset
    pub fn empty() -> Self {
        Self {
            container: None,
            pixel_format: None,
            framerate: None,
            hq_gif: None,
            loop_output: None,
        }
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn hq_gif_enabled(&self) -> bool {
        self.hq_gif.unwrap_or(false)
    }

    pub fn loop_output_enabled(&self) -> bool {
        self.loop_output.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests;
