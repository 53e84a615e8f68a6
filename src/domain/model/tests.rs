// Unit tests for domain models

use super::*;

#[test]
fn test_media_kind_from_mime() {
    assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
    assert_eq!(MediaKind::from_mime("image/gif"), MediaKind::Image);
    assert_eq!(MediaKind::from_mime("audio/mpeg"), MediaKind::Audio);
    assert_eq!(MediaKind::from_mime("text/plain"), MediaKind::Other);
}

#[test]
fn test_source_file_from_bytes() {
    let source = SourceFile::new("clip.mov", vec![1u8, 2, 3]);
    assert_eq!(source.name, "clip.mov");
    assert_eq!(source.size, 3);
    assert_eq!(source.media_type, "video/quicktime");
    assert_eq!(source.kind(), MediaKind::Video);
    assert_eq!(source.bytes(), &[1, 2, 3]);
    assert_eq!(source.extension(), Some("mov"));
}

#[test]
fn test_source_file_extension_uses_last_dot() {
    let source = SourceFile::new("holiday.final.webm", Vec::<u8>::new());
    assert_eq!(source.extension(), Some("webm"));

    let bare = SourceFile::new("README", Vec::<u8>::new());
    assert_eq!(bare.extension(), None);
    assert_eq!(bare.kind(), MediaKind::Other);

    let trailing = SourceFile::new("clip.", Vec::<u8>::new());
    assert_eq!(trailing.extension(), None);
}

#[test]
fn test_explicit_media_type_wins() {
    let source = SourceFile::with_media_type("capture", "image/png", vec![0u8; 8]);
    assert_eq!(source.kind(), MediaKind::Image);
    assert_eq!(source.size, 8);
}

#[test]
fn test_guess_media_type_is_case_insensitive() {
    assert_eq!(guess_media_type("A.JPG"), "image/jpeg");
    assert_eq!(guess_media_type("song.Mp3"), "audio/mpeg");
}

#[test]
fn test_output_options_defaults() {
    let defaults = OutputOptions::default();
    assert_eq!(defaults.hq_gif, Some(true));
    assert_eq!(defaults.loop_output, Some(true));
    assert!(defaults.container.is_none());

    let empty = OutputOptions::empty();
    assert!(!empty.hq_gif_enabled());
    assert!(!empty.loop_output_enabled());
}

#[test]
fn test_output_options_deserialize_partial() {
    let options: OutputOptions = serde_json::from_str(r#"{"container":"gif","framerate":15}"#).unwrap();
    assert_eq!(options.container.as_deref(), Some("gif"));
    assert_eq!(options.framerate, Some(15));
    assert_eq!(options.hq_gif, None);
}

#[tokio::test]
async fn test_source_file_from_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("frame.png");
    std::fs::write(&path, b"not really a png").unwrap();

    let source = SourceFile::from_path(&path).await.unwrap();
    assert_eq!(source.name, "frame.png");
    assert_eq!(source.size, 16);
    assert_eq!(source.kind(), MediaKind::Image);
}

#[tokio::test]
async fn test_source_file_from_missing_path() {
    let result = SourceFile::from_path("/definitely/not/here.mp4").await;
    assert!(matches!(result, Err(DomainError::Io(_))));
}
