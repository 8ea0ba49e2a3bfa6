//! Scripted extraction engine
//!
//! Returns a fixed title (or probe error), replays a list of progress
//! notifications and then finishes the way the test asked it to.

#![allow(dead_code)]

use async_trait::async_trait;
use fetchcore::download::{EngineOptions, EngineProgress, ExtractionEngine, FetchError, MediaInfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// How the scripted download ends.
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// Write these bytes to the requested output path
    WriteFile(Vec<u8>),
    /// Write a partial file, then fail with this message
    FailAfterPartial(String),
    /// Report success without producing any file
    NoFile,
    /// Never finish (until the future is dropped)
    Hang,
}

#[derive(Debug)]
pub struct FakeEngine {
    probe: Result<String, String>,
    progress: Vec<EngineProgress>,
    outcome: DownloadOutcome,
    probe_calls: AtomicUsize,
    download_calls: AtomicUsize,
    last_options: Mutex<Option<EngineOptions>>,
}

impl FakeEngine {
    /// Engine that resolves `title` and writes `content`.
    pub fn new(title: &str, content: &[u8]) -> Self {
        Self {
            probe: Ok(title.to_string()),
            progress: Vec::new(),
            outcome: DownloadOutcome::WriteFile(content.to_vec()),
            probe_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    /// Engine whose probe fails with `message`.
    pub fn unresolvable(message: &str) -> Self {
        let mut engine = Self::new("unused", b"unused");
        engine.probe = Err(message.to_string());
        engine
    }

    pub fn with_progress(mut self, progress: Vec<EngineProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_outcome(mut self, outcome: DownloadOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<EngineOptions> {
        self.last_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    async fn probe(&self, _url: &str) -> Result<MediaInfo, FetchError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        match &self.probe {
            Ok(title) => Ok(MediaInfo { title: title.clone() }),
            Err(message) => Err(FetchError::Extraction(message.clone())),
        }
    }

    async fn download(
        &self,
        _url: &str,
        options: &EngineOptions,
        progress_tx: mpsc::UnboundedSender<EngineProgress>,
    ) -> Result<(), FetchError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(options.clone());

        for progress in &self.progress {
            let _ = progress_tx.send(progress.clone());
            tokio::task::yield_now().await;
        }

        match &self.outcome {
            DownloadOutcome::WriteFile(content) => {
                tokio::fs::write(&options.output_path, content)
                    .await
                    .map_err(|e| FetchError::io(&options.output_path, e))?;
                Ok(())
            }
            DownloadOutcome::FailAfterPartial(message) => {
                let partial = options.output_path.with_extension("part");
                tokio::fs::write(&partial, b"partial")
                    .await
                    .map_err(|e| FetchError::io(&partial, e))?;
                Err(FetchError::Extraction(message.clone()))
            }
            DownloadOutcome::NoFile => Ok(()),
            DownloadOutcome::Hang => {
                let partial = options.output_path.with_extension("part");
                tokio::fs::write(&partial, b"partial")
                    .await
                    .map_err(|e| FetchError::io(&partial, e))?;
                loop {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
            }
        }
    }
}
