use std::path::PathBuf;
use thiserror::Error;

/// Structured error type for a single fetch.
///
/// Every variant is folded into `FetchResult::Failure` at the orchestrator
/// boundary; nothing of this type reaches the front end directly.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The engine could not resolve or fetch the resource (bad URL, unsupported
    /// host, network failure, private/region-locked/deleted media)
    #[error("{0}")]
    Extraction(String),

    /// Local filesystem failure (workspace creation, reading the output file)
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The caller cancelled the fetch
    #[error("fetch cancelled")]
    Cancelled,

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns subcategory for logs and metrics
    pub fn subcategory(&self) -> &'static str {
        match self {
            FetchError::Extraction(_) => "extraction",
            FetchError::Io { .. } => "io",
            FetchError::Cancelled => "cancelled",
            FetchError::InvalidRequest(_) => "invalid_request",
        }
    }
}
