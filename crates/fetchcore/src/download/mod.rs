//! Download orchestration, quality selection, progress and the yt-dlp engine

pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod quality;
pub mod request;
pub mod workspace;
pub mod ytdlp;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use engine::{EngineOptions, ExtractionEngine, MediaInfo, PostProcessing};
pub use error::FetchError;
pub use orchestrator::{engine_options, FetchOrchestrator, FetchResult};
pub use progress::{EngineProgress, EngineStatus, ProgressEvent, ProgressPhase, ProgressReporter};
pub use quality::{format_selector, MediaKind, QualityTier};
pub use request::FetchRequest;
pub use workspace::TempWorkspace;
pub use ytdlp::YtDlpEngine;
