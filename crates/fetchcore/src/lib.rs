//! Fetchcore - fetch online videos as MP4 or MP3 bytes
//!
//! Given a URL, a media kind and a quality tier, the library probes the title,
//! downloads (and merges or transcodes) the media into a throwaway workspace,
//! reports monotonic progress and hands back the file contents with a
//! filesystem-safe name. The workspace is gone by the time `fetch` returns.
//!
//! # Module Structure
//!
//! - `core`: Configuration, logging and filename utilities
//! - `download`: Orchestration, quality tiers, progress and the yt-dlp engine

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod core;
pub mod download;

// Re-export commonly used types for convenience
pub use core::{config, init_logger};
pub use download::{
    ExtractionEngine, FetchError, FetchOrchestrator, FetchRequest, FetchResult, MediaKind, ProgressEvent,
    ProgressPhase, QualityTier, YtDlpEngine,
};
