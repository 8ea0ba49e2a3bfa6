//! Media kinds, quality tiers and the tier → yt-dlp format-selector table.
//!
//! Selection is resolved entirely on our side before the engine is invoked;
//! there is no negotiation with the site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format selector used for every audio fetch.
pub const AUDIO_FORMAT_SELECTOR: &str = "bestaudio/best";

/// What the user wants out of the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// Extension of the file the orchestrator expects the engine to produce.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Video => "mp4",
            MediaKind::Audio => "mp3",
        }
    }

    /// MIME type offered to the front end alongside the bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaKind::Video => "video/mp4",
            MediaKind::Audio => "audio/mp3",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "Video"),
            MediaKind::Audio => write!(f, "Audio"),
        }
    }
}

/// User-facing resolution ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    #[serde(rename = "highest")]
    Highest,
    #[serde(rename = "2160p")]
    P2160,
    #[serde(rename = "1440p")]
    P1440,
    #[serde(rename = "1080p")]
    P1080,
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
}

impl QualityTier {
    /// All tiers, best first, in the order a picker should list them.
    pub const ALL: [QualityTier; 7] = [
        QualityTier::Highest,
        QualityTier::P2160,
        QualityTier::P1440,
        QualityTier::P1080,
        QualityTier::P720,
        QualityTier::P480,
        QualityTier::P360,
    ];

    /// Tier used when a label is not recognized.
    pub const FALLBACK: QualityTier = QualityTier::P720;

    /// Tier a picker preselects.
    pub const PICKER_DEFAULT: QualityTier = QualityTier::P1080;

    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Highest => "highest",
            QualityTier::P2160 => "2160p",
            QualityTier::P1440 => "1440p",
            QualityTier::P1080 => "1080p",
            QualityTier::P720 => "720p",
            QualityTier::P480 => "480p",
            QualityTier::P360 => "360p",
        }
    }

    /// yt-dlp format expression for this tier.
    pub fn format_selector(self) -> &'static str {
        match self {
            QualityTier::Highest => "bestvideo+bestaudio/best",
            QualityTier::P2160 => "bestvideo[height<=2160]+bestaudio/best[height<=2160]",
            QualityTier::P1440 => "bestvideo[height<=1440]+bestaudio/best[height<=1440]",
            QualityTier::P1080 => "bestvideo[height<=1080]+bestaudio/best[height<=1080]",
            QualityTier::P720 => "bestvideo[height<=720]+bestaudio/best[height<=720]",
            QualityTier::P480 => "bestvideo[height<=480]+bestaudio/best[height<=480]",
            QualityTier::P360 => "bestvideo[height<=360]+bestaudio/best[height<=360]",
        }
    }

    /// Parse a label, falling back to [`QualityTier::FALLBACK`] for anything unknown.
    ///
    /// The fallback is policy, not an error: it is logged and never surfaced.
    pub fn from_label_or_default(label: &str) -> QualityTier {
        label.parse().unwrap_or_else(|_| {
            log::warn!(
                "Unknown quality tier {:?}, falling back to {}",
                label,
                QualityTier::FALLBACK
            );
            QualityTier::FALLBACK
        })
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned by `QualityTier::from_str` for an unknown label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quality tier '{0}'")]
pub struct UnknownQualityTier(pub String);

impl FromStr for QualityTier {
    type Err = UnknownQualityTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        QualityTier::ALL
            .into_iter()
            .find(|tier| tier.label() == normalized)
            .ok_or_else(|| UnknownQualityTier(s.to_string()))
    }
}

/// Format selector for a kind/tier pair. The tier is ignored for audio.
pub fn format_selector(kind: MediaKind, tier: QualityTier) -> &'static str {
    match kind {
        MediaKind::Video => tier.format_selector(),
        MediaKind::Audio => AUDIO_FORMAT_SELECTOR,
    }
}
