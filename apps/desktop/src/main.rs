use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_files, load_settings, settings::parse_progress_policy, ConversionOutcome,
    ConverterController, FileHandle, PredictionController, PredictionOutcome, SubmitReport,
};
use shared::{domain::ProgressPolicy, error::FailureException};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::TerminalView;

#[derive(Parser, Debug)]
#[command(about = "Send DICOM images to the conversion service, or an image to the predictor")]
struct Args {
    /// Settings file; defaults to ./client.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert DICOM files, or a ZIP of them, to PNG.
    Convert {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long, value_parser = parse_policy_arg)]
        progress_policy: Option<ProgressPolicy>,
    },
    /// Classify a single PNG or JPEG image.
    Predict { path: PathBuf },
}

fn parse_policy_arg(raw: &str) -> Result<ProgressPolicy, String> {
    parse_progress_policy(raw)
        .ok_or_else(|| format!("unknown progress policy '{raw}' (distinguish_zip, counted_for_all)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    match args.command {
        Command::Convert {
            paths,
            output_dir,
            interval_ms,
            progress_policy,
        } => {
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            if let Some(ms) = interval_ms {
                settings.progress_interval_ms = ms;
            }
            if let Some(policy) = progress_policy {
                settings.progress_policy = policy;
            }

            let files = load_files(&paths).await.context("failed to read input files")?;
            let view = Arc::new(TerminalView::new(&settings.server_url));
            let mut controller = ConverterController::from_settings(&settings, view)
                .context("failed to set up converter")?;
            controller.on_dialog_change(files);

            match controller.submit().await {
                SubmitReport::Skipped => Ok(()),
                SubmitReport::Completed(ConversionOutcome::Error(failure)) => {
                    Err(FailureException::from(failure).into())
                }
                SubmitReport::Completed(_) => Ok(()),
            }
        }
        Command::Predict { path } => {
            let file = FileHandle::from_path(&path)
                .await
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let view = Arc::new(TerminalView::new(&settings.server_url));
            let mut controller = PredictionController::new(&settings.server_url, view)
                .context("failed to set up predictor")?;
            controller.on_file_change(Some(file));

            match controller.submit().await {
                Some(PredictionOutcome::Error(failure)) => Err(FailureException::from(failure).into()),
                _ => Ok(()),
            }
        }
    }
}
