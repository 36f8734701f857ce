//! Tikloader - TikTok video downloader
//!
//! Looks up a video through the metadata API, prints a preview and saves
//! the chosen variant (with or without watermark) to the download folder.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tikloader::app::{self, RunOptions};
use tikloader::utils::{self, AppSettings};
use tikloader::DownloadVariant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tikloader", version, about = "Download TikTok videos with or without watermark")]
struct Args {
    /// TikTok video URL (read from the clipboard when omitted)
    url: Option<String>,

    /// Which media variant to save: no-watermark or watermark
    #[arg(long, default_value = "no-watermark")]
    variant: DownloadVariant,

    /// Only show the video details, do not download
    #[arg(long)]
    info: bool,

    /// Directory to save into
    #[arg(long, env = "TIKLOADER_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Metadata endpoint override
    #[arg(long, env = "TIKLOADER_API_ENDPOINT")]
    api_endpoint: Option<String>,

    /// Settings file (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Choose the destination with the system save dialog
    #[arg(long)]
    ask: bool,

    /// Copy the no-watermark link to the clipboard
    #[arg(long)]
    copy: bool,

    /// Open the download folder when done
    #[arg(long)]
    reveal: bool,

    /// Write the effective settings to the settings file before running
    #[arg(long)]
    save_config: bool,
}

fn settings_path(args: &Args) -> PathBuf {
    args.config.clone().unwrap_or_else(utils::get_settings_path)
}

fn load_settings(args: &Args) -> Result<AppSettings> {
    let path = settings_path(args);
    let mut settings = AppSettings::load(&path)?;

    if let Some(dir) = &args.output_dir {
        settings.download_location = utils::resolve_output_dir(dir);
    }
    if let Some(endpoint) = &args.api_endpoint {
        settings.api_endpoint = endpoint.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {:#}", e);
            return ExitCode::from(2);
        }
    };

    if args.save_config {
        let path = settings_path(&args);
        if let Err(e) = settings.save(&path) {
            eprintln!("Failed to save settings: {:#}", e);
            return ExitCode::FAILURE;
        }
        println!("Settings saved to {}", path.display());
    }

    let options = RunOptions {
        url: args.url,
        variant: args.variant,
        info_only: args.info,
        ask: args.ask,
        copy: args.copy,
        reveal: args.reveal,
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(app::run(settings, options)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
