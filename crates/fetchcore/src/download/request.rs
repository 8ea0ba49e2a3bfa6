//! The immutable description of one user action.

use crate::download::error::FetchError;
use crate::download::quality::{MediaKind, QualityTier};
use serde::{Deserialize, Serialize};

/// One fetch, as collected from the front end.
///
/// The URL is only checked for non-emptiness; whether it resolves is the
/// engine's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFetchRequest")]
pub struct FetchRequest {
    url: String,
    kind: MediaKind,
    quality: QualityTier,
}

#[derive(Deserialize)]
struct RawFetchRequest {
    url: String,
    kind: MediaKind,
    #[serde(default)]
    quality: QualityTier,
}

impl TryFrom<RawFetchRequest> for FetchRequest {
    type Error = FetchError;

    fn try_from(raw: RawFetchRequest) -> Result<Self, Self::Error> {
        FetchRequest::new(raw.url, raw.kind, raw.quality)
    }
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, kind: MediaKind, quality: QualityTier) -> Result<Self, FetchError> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(FetchError::InvalidRequest("URL is empty".to_string()));
        }
        Ok(Self { url, kind, quality })
    }

    /// Video request at the given tier.
    pub fn video(url: impl Into<String>, quality: QualityTier) -> Result<Self, FetchError> {
        Self::new(url, MediaKind::Video, quality)
    }

    /// Audio request; the tier is irrelevant and left at its default.
    pub fn audio(url: impl Into<String>) -> Result<Self, FetchError> {
        Self::new(url, MediaKind::Audio, QualityTier::default())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn quality(&self) -> QualityTier {
        self.quality
    }
}
