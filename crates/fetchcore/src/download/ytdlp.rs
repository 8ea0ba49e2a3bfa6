//! The extraction engine backed by the yt-dlp executable.
//!
//! yt-dlp (with ffmpeg on PATH) does all the real work: resolving the page,
//! picking streams, merging, transcoding audio. We only build argument lists,
//! read its output and map failures.

use crate::core::config;
use crate::core::utils::escape_output_template;
use crate::download::engine::{EngineOptions, ExtractionEngine, MediaInfo};
use crate::download::error::FetchError;
use crate::download::progress::{EngineProgress, EngineStatus};
use crate::download::ytdlp_errors::{analyze_ytdlp_error, describe_failure};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// First token of every progress line we ask yt-dlp to print.
pub const PROGRESS_MARKER: &str = "tubefetch-progress";

/// `--progress-template` value; fields are space separated, `NA` when unknown.
pub const PROGRESS_TEMPLATE: &str = "download:tubefetch-progress %(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s %(progress.status)s";

/// How many stderr lines are kept for error reporting
const STDERR_TAIL_LINES: usize = 200;

/// Parses one line of yt-dlp stdout printed through [`PROGRESS_TEMPLATE`].
///
/// Example: `tubefetch-progress 1048576 10485760 NA downloading`
pub fn parse_progress(line: &str) -> Option<EngineProgress> {
    let mut fields = line.split_whitespace();
    if fields.next()? != PROGRESS_MARKER {
        return None;
    }

    let downloaded_bytes = parse_bytes(fields.next()?);
    let total_bytes = parse_bytes(fields.next()?);
    let total_bytes_estimate = parse_bytes(fields.next()?);
    let status = match fields.next()? {
        "downloading" => EngineStatus::Downloading,
        "finished" => EngineStatus::Finished,
        _ => EngineStatus::Other,
    };

    Some(EngineProgress {
        status,
        downloaded_bytes,
        total_bytes,
        total_bytes_estimate,
    })
}

/// Byte counts arrive as integers, floats (estimates) or `NA`.
fn parse_bytes(field: &str) -> Option<u64> {
    let value = field.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u64)
    } else {
        None
    }
}

/// Next line of child output, decoded lossily; `None` at EOF or on a read error.
///
/// Titles and paths echoed by yt-dlp are not always valid UTF-8, and the
/// pipe has to keep draining past them or the child dies of SIGPIPE.
async fn next_lossy_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    match reader.read_until(b'\n', buf).await {
        Ok(0) => None,
        Ok(_) => {
            let line = String::from_utf8_lossy(buf);
            Some(line.trim_end_matches(['\r', '\n']).to_string())
        }
        Err(e) => {
            log::debug!("Failed to read yt-dlp output: {}", e);
            None
        }
    }
}

/// yt-dlp output template for `output_path`: the extension is left to yt-dlp.
pub fn output_template(output_path: &Path) -> String {
    let stem = output_path.with_extension("");
    format!("{}.%(ext)s", escape_output_template(&stem.to_string_lossy()))
}

/// Arguments for the title probe.
pub fn build_probe_args(url: &str) -> Vec<String> {
    ["--print", "%(title)s", "--no-playlist", "--skip-download", "--no-warnings", "--", url]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Arguments for the download itself.
pub fn build_download_args(url: &str, options: &EngineOptions) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-o".to_string(),
        output_template(&options.output_path),
        "--newline".to_string(),
        "--no-playlist".to_string(),
        "--no-part".to_string(),
        "--progress-template".to_string(),
        PROGRESS_TEMPLATE.to_string(),
        "--format".to_string(),
        options.format_selector.clone(),
    ];

    if let Some(container) = &options.output_container {
        args.push("--merge-output-format".to_string());
        args.push(container.clone());
    }

    if let Some(pp) = &options.post_processing {
        args.extend([
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            pp.target_codec.clone(),
            "--audio-quality".to_string(),
            format!("{}K", pp.target_bitrate_kbps),
        ]);
    }

    args.push("--".to_string());
    args.push(url.to_string());
    args
}

/// Extraction engine powered by yt-dlp.
#[derive(Debug, Clone)]
pub struct YtDlpEngine {
    bin: String,
    probe_timeout: Duration,
    download_timeout: Duration,
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpEngine {
    /// Engine using `YTDL_BIN` and the configured timeouts.
    pub fn new() -> Self {
        Self {
            bin: config::YTDL_BIN.clone(),
            probe_timeout: config::download::probe_timeout(),
            download_timeout: config::download::download_timeout(),
        }
    }

    pub fn with_binary(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    pub fn with_timeouts(mut self, probe: Duration, download: Duration) -> Self {
        self.probe_timeout = probe;
        self.download_timeout = download;
        self
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.bin);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl ExtractionEngine for YtDlpEngine {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<MediaInfo, FetchError> {
        let args = build_probe_args(url);
        log::debug!("yt-dlp command for metadata: {} {}", self.bin, args.join(" "));

        let output = timeout(self.probe_timeout, self.command(&args).output())
            .await
            .map_err(|_| {
                log::error!("yt-dlp probe timed out after {}s", self.probe_timeout.as_secs());
                FetchError::Extraction(format!(
                    "yt-dlp timed out after {}s while reading the title",
                    self.probe_timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                log::error!("Failed to execute {}: {}", self.bin, e);
                FetchError::Extraction(format!("Failed to start {}: {}", self.bin, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!(
                "yt-dlp failed to get metadata, error type: {:?}",
                analyze_ytdlp_error(&stderr)
            );
            log::debug!("yt-dlp stderr: {}", stderr);
            return Err(FetchError::Extraction(describe_failure(&stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        // Only the line terminator is stripped; the title is otherwise kept verbatim
        let title = stdout.lines().next().unwrap_or_default();
        if title.is_empty() {
            log::error!("yt-dlp returned empty title for URL: {}", url);
            return Err(FetchError::Extraction(
                "Failed to get video title. Video might be unavailable or private.".to_string(),
            ));
        }

        log::debug!("Got metadata from yt-dlp: title='{}'", title);
        Ok(MediaInfo {
            title: title.to_string(),
        })
    }

    async fn download(
        &self,
        url: &str,
        options: &EngineOptions,
        progress_tx: mpsc::UnboundedSender<EngineProgress>,
    ) -> Result<(), FetchError> {
        let args = build_download_args(url, options);
        log::debug!("yt-dlp command for download: {} {}", self.bin, args.join(" "));

        let mut child = self.command(&args).spawn().map_err(|e| {
            log::error!("Failed to spawn yt-dlp: {}", e);
            FetchError::Extraction(format!("Failed to start {}: {}", self.bin, e))
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let read_stdout = async {
            let Some(stdout) = stdout else { return };
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            while let Some(line) = next_lossy_line(&mut reader, &mut buf).await {
                match parse_progress(&line) {
                    Some(progress) => {
                        log::trace!("yt-dlp progress: {:?}", progress);
                        let _ = progress_tx.send(progress);
                    }
                    None => log::debug!("yt-dlp stdout: {}", line),
                }
            }
        };

        let read_stderr = async {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            let Some(stderr) = stderr else { return tail };
            let mut reader = BufReader::new(stderr);
            let mut buf = Vec::new();
            while let Some(line) = next_lossy_line(&mut reader, &mut buf).await {
                log::debug!("yt-dlp stderr: {}", line);
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail
        };

        let run = async {
            let ((), tail) = tokio::join!(read_stdout, read_stderr);
            (child.wait().await, tail)
        };

        let (status, tail) = timeout(self.download_timeout, run).await.map_err(|_| {
            log::error!(
                "yt-dlp process timed out after {}s, killing",
                self.download_timeout.as_secs()
            );
            FetchError::Extraction(format!(
                "yt-dlp timed out after {}s",
                self.download_timeout.as_secs()
            ))
        })?;

        let status = status.map_err(|e| FetchError::Extraction(format!("yt-dlp process failed: {}", e)))?;
        if !status.success() {
            let stderr_text = Vec::from(tail).join("\n");
            log::error!(
                "yt-dlp download failed ({}), error type: {:?}",
                status,
                analyze_ytdlp_error(&stderr_text)
            );
            return Err(FetchError::Extraction(describe_failure(&stderr_text)));
        }

        log::debug!("yt-dlp finished: {}", options.output_path.display());
        Ok(())
    }
}
