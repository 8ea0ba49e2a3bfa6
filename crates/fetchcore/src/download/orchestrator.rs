//! One end-to-end fetch: probe → download → load into memory.
//!
//! The orchestrator owns no UI state and never retries. Every fetch gets its
//! own [`TempWorkspace`]; nothing is shared between calls, so concurrent
//! fetches need no locking. Callers are expected to serialize fetches per
//! trigger (e.g. disable the button while one is in flight).

use crate::core::config;
use crate::core::utils::display_name;
use crate::download::engine::{EngineOptions, ExtractionEngine, PostProcessing};
use crate::download::error::FetchError;
use crate::download::progress::{ProgressEvent, ProgressReporter};
use crate::download::quality::{format_selector, MediaKind};
use crate::download::request::FetchRequest;
use crate::download::workspace::TempWorkspace;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Outcome of one fetch. Never both bytes and a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success {
        content: Vec<u8>,
        display_name: String,
        kind: MediaKind,
    },
    Failure {
        reason: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    /// `display_name.ext`, the name a save dialog should propose.
    pub fn file_name(&self) -> Option<String> {
        match self {
            FetchResult::Success { display_name, kind, .. } => Some(format!("{}.{}", display_name, kind.extension())),
            FetchResult::Failure { .. } => None,
        }
    }

    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            FetchResult::Success { kind, .. } => Some(kind.mime_type()),
            FetchResult::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::Failure { reason } => Some(reason),
        }
    }
}

/// Engine options for `request`, writing to `output_path`.
pub fn engine_options(request: &FetchRequest, output_path: PathBuf) -> EngineOptions {
    let selector = format_selector(request.kind(), request.quality()).to_string();
    match request.kind() {
        MediaKind::Video => EngineOptions {
            format_selector: selector,
            output_container: Some(config::download::VIDEO_CONTAINER.to_string()),
            output_path,
            post_processing: None,
        },
        MediaKind::Audio => EngineOptions {
            format_selector: selector,
            output_container: None,
            output_path,
            post_processing: Some(PostProcessing {
                target_codec: config::download::AUDIO_CODEC.to_string(),
                target_bitrate_kbps: config::download::AUDIO_BITRATE_KBPS,
            }),
        },
    }
}

/// Runs fetches against an injected extraction engine.
pub struct FetchOrchestrator<E> {
    engine: E,
    workspace_root: PathBuf,
}

impl<E: ExtractionEngine> FetchOrchestrator<E> {
    /// Orchestrator creating workspaces under `TEMP_FILES_DIR`.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            workspace_root: config::TEMP_FILES_DIR.clone(),
        }
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Fetch without a way to cancel.
    pub async fn fetch<F>(&self, request: &FetchRequest, on_progress: F) -> FetchResult
    where
        F: FnMut(ProgressEvent) + Send,
    {
        self.fetch_with_cancel(request, &CancellationToken::new(), on_progress)
            .await
    }

    /// Fetch, giving up as soon as `cancel` fires.
    ///
    /// Progress callbacks run on the calling task, one at a time.
    pub async fn fetch_with_cancel<F>(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> FetchResult
    where
        F: FnMut(ProgressEvent) + Send,
    {
        log::info!(
            "Fetching {} ({}, {}) via {}",
            request.url(),
            request.kind(),
            request.quality(),
            self.engine.name()
        );

        match self.try_fetch(request, cancel, on_progress).await {
            Ok((content, display_name)) => {
                log::info!("Fetched '{}' ({} bytes)", display_name, content.len());
                FetchResult::Success {
                    content,
                    display_name,
                    kind: request.kind(),
                }
            }
            Err(e) => {
                log::error!("Download error [{}]: {}", e.subcategory(), e);
                FetchResult::Failure { reason: e.to_string() }
            }
        }
    }

    async fn try_fetch<F>(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<(Vec<u8>, String), FetchError>
    where
        F: FnMut(ProgressEvent) + Send,
    {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        // Dropped (and removed) on every return below
        let workspace = TempWorkspace::create_in(&self.workspace_root)?;

        let info = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            info = self.engine.probe(request.url()) => info?,
        };
        let name = display_name(&info.title);
        log::debug!("Probed title {:?}, saving as {:?}", info.title, name);

        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let options = engine_options(request, workspace.file_path(&name, request.kind().extension()));
        log::debug!("Output path: {}", options.output_path.display());

        let mut reporter = ProgressReporter::new(on_progress);
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        {
            let download = self.engine.download(request.url(), &options, progress_tx);
            let drain = async {
                while let Some(progress) = progress_rx.recv().await {
                    reporter.observe(progress);
                }
            };
            let transfer = async { tokio::join!(download, drain).0 };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                result = transfer => result?,
            }
        }

        let content = tokio::fs::read(&options.output_path)
            .await
            .map_err(|e| FetchError::io(&options.output_path, e))?;
        if content.is_empty() {
            return Err(FetchError::io(
                &options.output_path,
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "downloaded file is empty"),
            ));
        }

        reporter.complete();

        if let Err(e) = workspace.close() {
            log::warn!("Failed to remove workspace: {}", e);
        }

        Ok((content, name))
    }
}
