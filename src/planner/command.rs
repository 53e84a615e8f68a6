//! Command builder for the transcoding engine
//!
//! The engine is sensitive to argument position: input-side options (`-ss`,
//! `-to`) must precede `-i`, output-side options follow it, and the output
//! file name comes last.

use tracing::debug;

use crate::domain::containers;
use crate::domain::errors::DomainError;
use crate::domain::model::{InputOptions, OutputOptions};
use crate::planner::filters::{FilterGraph, HQ_GIF_PALETTE_FILTER};
use crate::planner::RenderPlan;

/// Append-only argument vector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentList {
    args: Vec<String>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bare positional argument
    pub fn arg(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(value.into());
        self
    }

    /// Append a flag followed by its value
    pub fn option(&mut self, flag: &str, value: impl Into<String>) -> &mut Self {
        self.args.push(flag.to_string());
        self.args.push(value.into());
        self
    }

    /// Append a flag and value only when the value is present
    pub fn option_if_some<V: Into<String>>(&mut self, flag: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.option(flag, value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.args
    }
}

/// Translates option records into a [`RenderPlan`]
pub struct CommandBuilder;

impl CommandBuilder {
    /// Build the engine command for one render
    pub fn build(input: &InputOptions, output: &OutputOptions) -> Result<RenderPlan, DomainError> {
        let file = input
            .file
            .as_ref()
            .ok_or_else(|| DomainError::InvalidSessionState("No source file selected".to_string()))?;

        let mut args = ArgumentList::new();
        args.option_if_some("-ss", input.trim_start.as_deref())
            .option_if_some("-to", input.trim_end.as_deref())
            .option("-i", file.name.as_str());

        let container = Self::resolve_container(file.extension(), output)?;
        let output_file_name = format!("output.{}", container);
        let resolved_output = OutputOptions {
            container: Some(container.clone()),
            ..output.clone()
        };

        args.option_if_some("-r", output.framerate.map(|rate| rate.to_string()))
            .option_if_some("-pix_fmt", output.pixel_format.as_deref());

        let mut filters = FilterGraph::new();
        if container == "gif" && output.hq_gif_enabled() {
            filters.push(HQ_GIF_PALETTE_FILTER);
        }
        args.option_if_some("-filter_complex", filters.to_expression());

        if container == "webp" && output.loop_output_enabled() {
            args.option("-loop", "0");
        }

        args.arg(output_file_name.as_str());

        let output_mime = containers::mime_for(&container)?.to_string();
        let args = args.into_vec();
        debug!("Built engine command: {:?}", args);

        Ok(RenderPlan {
            args,
            output_file_name,
            output_mime,
            resolved_output,
        })
    }

    /// Explicit container, else the source file's extension
    fn resolve_container(
        extension: Option<&str>,
        output: &OutputOptions,
    ) -> Result<String, DomainError> {
        output
            .container
            .as_deref()
            .filter(|container| !container.is_empty())
            .or(extension)
            .map(str::to_string)
            .ok_or(DomainError::NoContainerSelected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SourceFile;

    fn input(name: &str) -> InputOptions {
        InputOptions::with_file(SourceFile::new(name, vec![0u8; 4]))
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_container_falls_back_to_extension() {
        let plan = CommandBuilder::build(&input("clip.webm"), &OutputOptions::empty()).unwrap();
        assert_eq!(plan.args, strings(&["-i", "clip.webm", "output.webm"]));
        assert_eq!(plan.output_file_name, "output.webm");
        assert_eq!(plan.output_mime, "video/webm");
        assert_eq!(plan.resolved_output.container.as_deref(), Some("webm"));
    }

    #[test]
    fn test_unlisted_extension_is_unknown_container() {
        let result = CommandBuilder::build(&input("clip.mov"), &OutputOptions::empty());
        assert_eq!(result, Err(DomainError::UnknownContainer("mov".to_string())));
    }

    #[test]
    fn test_no_extension_and_no_container() {
        let result = CommandBuilder::build(&input("capture"), &OutputOptions::empty());
        assert_eq!(result, Err(DomainError::NoContainerSelected));
    }

    #[test]
    fn test_empty_container_counts_as_unset() {
        let output = OutputOptions::empty().with_container("");
        let plan = CommandBuilder::build(&input("a.png"), &output).unwrap();
        assert_eq!(plan.container(), "png");
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let result = CommandBuilder::build(&InputOptions::default(), &OutputOptions::default());
        assert!(matches!(result, Err(DomainError::InvalidSessionState(_))));
    }

    #[test]
    fn test_hq_gif_with_trim() {
        let mut options = input("a.mp4");
        options.trim_start = Some("5".to_string());
        options.trim_end = Some("10".to_string());
        let output = OutputOptions {
            hq_gif: Some(true),
            ..OutputOptions::empty().with_container("gif")
        };

        let plan = CommandBuilder::build(&options, &output).unwrap();
        assert_eq!(
            plan.args,
            strings(&[
                "-ss",
                "5",
                "-to",
                "10",
                "-i",
                "a.mp4",
                "-filter_complex",
                "[0]split=2[v1][v2];[v1]palettegen=stats_mode=full[palette];[v2][palette]paletteuse=dither=sierra2_4a",
                "output.gif",
            ])
        );
        assert_eq!(plan.output_mime, "image/gif");
    }

    #[test]
    fn test_plain_gif_has_no_filter_graph() {
        let output = OutputOptions {
            hq_gif: Some(false),
            ..OutputOptions::empty().with_container("gif")
        };
        let plan = CommandBuilder::build(&input("a.mp4"), &output).unwrap();
        assert_eq!(plan.args, strings(&["-i", "a.mp4", "output.gif"]));
    }

    #[test]
    fn test_gif_source_without_explicit_container_gets_palette() {
        let plan = CommandBuilder::build(&input("anim.gif"), &OutputOptions::default()).unwrap();
        assert!(plan.args.contains(&"-filter_complex".to_string()));
    }

    #[test]
    fn test_webp_loop() {
        let output = OutputOptions {
            loop_output: Some(true),
            ..OutputOptions::empty().with_container("webp")
        };
        let plan = CommandBuilder::build(&input("a.png"), &output).unwrap();
        assert_eq!(plan.args, strings(&["-i", "a.png", "-loop", "0", "output.webp"]));
        assert_eq!(plan.output_file_name, "output.webp");
        assert_eq!(plan.output_mime, "image/webp");
    }

    #[test]
    fn test_extras_ignored_for_other_containers() {
        let plan = CommandBuilder::build(&input("a.mp4"), &OutputOptions::default().with_container("mp4"))
            .unwrap();
        assert_eq!(plan.args, strings(&["-i", "a.mp4", "output.mp4"]));
        // Extras are carried through untouched in the resolved options
        assert_eq!(plan.resolved_output.hq_gif, Some(true));
    }

    #[test]
    fn test_framerate_and_pixel_format_order() {
        let output = OutputOptions {
            framerate: Some(15),
            pixel_format: Some("rgb24".to_string()),
            loop_output: Some(true),
            ..OutputOptions::empty().with_container("webp")
        };
        let mut options = input("a.mp4");
        options.trim_end = Some("1:00".to_string());

        let plan = CommandBuilder::build(&options, &output).unwrap();
        assert_eq!(
            plan.args,
            strings(&[
                "-to", "1:00", "-i", "a.mp4", "-r", "15", "-pix_fmt", "rgb24", "-loop", "0",
                "output.webp",
            ])
        );
    }

    #[test]
    fn test_argument_list_helpers() {
        let mut args = ArgumentList::new();
        assert!(args.is_empty());
        args.option_if_some::<&str>("-ss", None).arg("out.mp4");
        assert_eq!(args.len(), 1);
        assert_eq!(args.into_vec(), strings(&["out.mp4"]));
    }
}
