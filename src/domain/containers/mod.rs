// Output containers - the fixed container to MIME table

use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::model::MediaKind;

/// Output container supported by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    /// Container name as used in file extensions and option values
    pub name: &'static str,
    /// MIME type of the produced file
    pub mime: &'static str,
    /// Preview element the output should be shown in
    pub preview: MediaKind,
}

const CONTAINERS: &[ContainerInfo] = &[
    ContainerInfo { name: "mp4", mime: "video/mp4", preview: MediaKind::Video },
    ContainerInfo { name: "webm", mime: "video/webm", preview: MediaKind::Video },
    ContainerInfo { name: "png", mime: "image/png", preview: MediaKind::Image },
    ContainerInfo { name: "jpg", mime: "image/jpeg", preview: MediaKind::Image },
    ContainerInfo { name: "webp", mime: "image/webp", preview: MediaKind::Image },
    ContainerInfo { name: "gif", mime: "image/gif", preview: MediaKind::Image },
];

/// All supported output containers, video containers first
pub fn all() -> &'static [ContainerInfo] {
    CONTAINERS
}

/// Look up a container by exact name
pub fn lookup(container: &str) -> Result<&'static ContainerInfo, DomainError> {
    CONTAINERS
        .iter()
        .find(|info| info.name == container)
        .ok_or_else(|| DomainError::UnknownContainer(container.to_string()))
}

/// MIME type for a container
pub fn mime_for(container: &str) -> Result<&'static str, DomainError> {
    lookup(container).map(|info| info.mime)
}

/// Preview element kind for a container, `None` when unknown
pub fn preview_kind(container: &str) -> Option<MediaKind> {
    lookup(container).ok().map(|info| info.preview)
}
