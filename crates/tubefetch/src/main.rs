#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use anyhow::{Context, Result};
use fetchcore::core::config;
use fetchcore::{
    init_logger, FetchOrchestrator, FetchRequest, FetchResult, MediaKind, ProgressEvent, ProgressPhase, QualityTier,
    YtDlpEngine,
};
use std::path::Path;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

mod cli;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before config is read
    let _ = dotenvy::dotenv();

    init_logger(&config::LOG_FILE_PATH, &config::LOG_LEVEL)?;

    if cli.list_qualities {
        print_qualities();
        return Ok(ExitCode::SUCCESS);
    }

    let url = cli.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        log::warn!("No URL given");
        eprintln!("Please enter a URL");
        return Ok(ExitCode::from(2));
    }

    let kind = if cli.audio { MediaKind::Audio } else { MediaKind::Video };
    let quality = QualityTier::from_label_or_default(&cli.quality);

    run_download(url, kind, quality, &cli.output_dir).await
}

fn print_qualities() {
    for tier in QualityTier::ALL {
        if tier == QualityTier::PICKER_DEFAULT {
            println!("{} (default)", tier);
        } else {
            println!("{}", tier);
        }
    }
}

/// Progress text for stderr. `Complete` ends the line so later log output
/// starts on a fresh one.
fn progress_line(event: &ProgressEvent) -> String {
    match (event.phase, event.fraction()) {
        (ProgressPhase::Complete, _) => "\rDownloading: 100.0%\n".to_string(),
        (_, Some(fraction)) => format!("\rDownloading: {:.1}%", fraction * 100.0),
        (_, None) => format!("\rDownloading: {} bytes", event.bytes_done),
    }
}

async fn run_download(url: &str, kind: MediaKind, quality: QualityTier, output_dir: &Path) -> Result<ExitCode> {
    let request = match FetchRequest::new(url, kind, quality) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Download error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("URL: {}", request.url());
    match kind {
        MediaKind::Video => println!("Format: {} ({})", kind, quality),
        MediaKind::Audio => println!("Format: {}", kind),
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling download");
            interrupt.cancel();
        }
    });

    let orchestrator = FetchOrchestrator::new(YtDlpEngine::new());
    let mut line_open = false;
    let result = orchestrator
        .fetch_with_cancel(&request, &cancel, |event: ProgressEvent| {
            let line = progress_line(&event);
            line_open = !line.ends_with('\n');
            eprint!("{}", line);
        })
        .await;
    if line_open {
        eprintln!();
    }

    match result {
        FetchResult::Success {
            content,
            display_name,
            kind,
        } => {
            fs_err::create_dir_all(output_dir)?;
            let path = output_dir.join(format!("{}.{}", display_name, kind.extension()));
            fs_err::write(&path, &content).context("Failed to save the downloaded file")?;

            log::info!("Saved {} ({} bytes)", path.display(), content.len());
            println!("Saved: {} ({}, {} bytes)", path.display(), kind.mime_type(), content.len());
            Ok(ExitCode::SUCCESS)
        }
        FetchResult::Failure { reason } => {
            eprintln!("Download error: {}", reason);
            Ok(ExitCode::FAILURE)
        }
    }
}
