//! Command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{FfmpegEngineFactory, FfprobeAdapter};
use crate::app::{ConvertInteractor, InspectInteractor, RenderOutcome};
use crate::cli::args::{ConvertOptionArgs, InspectArgs, PlanArgs, RenderArgs};
use crate::config::AppConfig;
use crate::domain::containers;
use crate::domain::model::SourceFile;
use crate::error::ConvertError;
use crate::session::EngineSession;
use crate::utils::format_file_size;
use crate::utils::logging::ProgressReporter;

/// Execute the render command
pub async fn render(args: RenderArgs, config: &AppConfig) -> Result<()> {
    info!("Starting render operation");
    let (source, duration) = load_source(&args.options.input, config).await?;

    let mut interactor = new_interactor(config);
    apply_options(&mut interactor, &args.options, source, duration, config)?;
    if let (Some((start, end)), Some((from, to))) =
        (interactor.trim_positions()?, interactor.trim_labels())
    {
        info!("Trim window: {} to {} ({:.3}s to {:.3}s)", from, to, start, end);
    }

    let mut progress = interactor.session().subscribe_progress();
    let mut reporter = ProgressReporter::start("Render");
    let outcome = {
        let render = interactor.start_render();
        tokio::pin!(render);
        loop {
            tokio::select! {
                outcome = &mut render => break outcome,
                Ok(()) = progress.changed() => {
                    let latest = *progress.borrow_and_update();
                    if let Some(percent) = latest {
                        reporter.update(percent);
                    }
                }
            }
        }
    };
    reporter.complete(matches!(outcome, Ok(RenderOutcome::Completed(_))));

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            if !e.is_configuration_error() {
                report_engine_log(&interactor).await;
            }
            return Err(ConvertError::from(e)).context("Render failed");
        }
    };

    match outcome {
        RenderOutcome::Completed(output) => {
            let path = args
                .output
                .unwrap_or_else(|| PathBuf::from(&output.file_name));
            tokio::fs::write(&path, &output.bytes)
                .await
                .map_err(|e| ConvertError::OutputError {
                    message: format!("{}: {}", path.display(), e),
                })?;

            println!(
                "Wrote {} ({}, {})",
                path.display(),
                format_file_size(output.size as u64),
                output.mime
            );
            if let Some(kind) = containers::preview_kind(&output.container) {
                info!("Output previews as {}", kind);
            }
            info!("Render operation completed successfully");
            Ok(())
        }
        RenderOutcome::NoOutput => {
            report_engine_log(&interactor).await;
            anyhow::bail!("The engine finished without producing any output")
        }
    }
}

/// Execute the plan command
pub async fn plan(args: PlanArgs, config: &AppConfig) -> Result<()> {
    let name = file_name_of(&args.options.input)?;
    let source = SourceFile::new(name, Vec::new());

    let mut interactor = new_interactor(config);
    apply_options(&mut interactor, &args.options, source, None, config)?;
    let plan = interactor
        .plan()
        .map_err(ConvertError::from)
        .context("Cannot build the engine command")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("Arguments: {}", plan.args.join(" "));
        println!("Output:    {} ({})", plan.output_file_name, plan.output_mime);
        println!("Options:   {}", serde_json::to_string(&plan.resolved_output)?);
    }
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, config: &AppConfig) -> Result<()> {
    info!("Starting inspect operation");
    if !args.input.exists() {
        return Err(ConvertError::InputFileNotFound {
            path: args.input.display().to_string(),
        }
        .into());
    }

    let (_, report) = new_inspector(config)
        .inspect(&args.input)
        .await
        .map_err(ConvertError::from)
        .context("Failed to inspect input file")?;

    let summary = InspectInteractor::format_report(&report, args.format.into())?;
    print!("{}", summary);
    if !summary.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Execute the containers command
pub fn containers() -> Result<()> {
    println!("{:<6} {:<12} {}", "NAME", "MIME", "PREVIEW");
    for info in containers::all() {
        println!("{:<6} {:<12} {}", info.name, info.mime, info.preview);
    }
    Ok(())
}

fn new_interactor(config: &AppConfig) -> ConvertInteractor {
    let factory = Arc::new(FfmpegEngineFactory::new(config.engine.ffmpeg_path.clone()));
    let session = Arc::new(EngineSession::new(factory, config.session.reset_policy));
    ConvertInteractor::new(session, config.default_output_options())
}

/// Select the source and copy command-line options onto the interactor
fn apply_options(
    interactor: &mut ConvertInteractor,
    options: &ConvertOptionArgs,
    source: SourceFile,
    duration: Option<f64>,
    config: &AppConfig,
) -> Result<()> {
    interactor.select_file(source, duration);

    if let Some(start) = &options.ss {
        interactor
            .set_trim_start(start)
            .with_context(|| format!("Invalid trim start '{}'", start))?;
    }
    if let Some(end) = &options.to {
        interactor
            .set_trim_end(end)
            .with_context(|| format!("Invalid trim end '{}'", end))?;
    }

    let output = interactor.output_mut();
    output.container = options
        .container
        .as_ref()
        .map(|container| container.to_ascii_lowercase());
    output.pixel_format = options.pix_fmt.clone();
    output.framerate = options.framerate;
    output.hq_gif = Some(config.output.hq_gif && !options.no_hq_gif);
    output.loop_output = Some(config.output.loop_output && !options.no_loop);
    Ok(())
}

/// Read the source and probe its duration
async fn load_source(path: &Path, config: &AppConfig) -> Result<(SourceFile, Option<f64>)> {
    if !path.exists() {
        return Err(ConvertError::InputFileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let (source, report) = new_inspector(config)
        .inspect(path)
        .await
        .map_err(ConvertError::from)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    info!("Input: {} ({})", source.name, format_file_size(source.size));
    Ok((source, report.duration))
}

fn new_inspector(config: &AppConfig) -> InspectInteractor {
    InspectInteractor::new(Arc::new(FfprobeAdapter::new(
        config.engine.ffprobe_path.clone(),
    )))
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            ConvertError::InputFileNotFound {
                path: path.display().to_string(),
            }
            .into()
        })
}

async fn report_engine_log(interactor: &ConvertInteractor) {
    let log = interactor.session().log().await;
    if !log.is_empty() {
        warn!("Engine log:\n{}", log);
    }
}
