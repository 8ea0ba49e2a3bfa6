//! The extraction engine capability.
//!
//! Everything site-specific (manifest parsing, stream negotiation, muxing,
//! transcoding) lives behind this trait. The orchestrator only ever asks for
//! a title and for a file at a given path.

use crate::download::error::FetchError;
use crate::download::progress::EngineProgress;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// What a metadata probe returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    pub title: String,
}

/// Audio transcode step applied after the download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessing {
    pub target_codec: String,
    pub target_bitrate_kbps: u32,
}

/// Options for a single engine download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Format selection expression, e.g. `bestvideo[height<=720]+bestaudio/best[height<=720]`
    pub format_selector: String,
    /// Container separate streams are merged into (video only)
    pub output_container: Option<String>,
    /// Where the finished file is expected
    pub output_path: PathBuf,
    pub post_processing: Option<PostProcessing>,
}

/// Trait for extraction engine implementations.
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Human-readable name of this engine (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Resolve the item's canonical title without downloading media.
    async fn probe(&self, url: &str) -> Result<MediaInfo, FetchError>;

    /// Download (and post-process) into `options.output_path`, sending native
    /// progress through the channel. Dropping the returned future must stop the work.
    async fn download(
        &self,
        url: &str,
        options: &EngineOptions,
        progress_tx: mpsc::UnboundedSender<EngineProgress>,
    ) -> Result<(), FetchError>;
}
