use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Root directory under which per-fetch workspaces are created
/// Read from TEMP_FILES_DIR environment variable
/// Defaults to the system temp directory, supports tilde (~) expansion
pub static TEMP_FILES_DIR: Lazy<PathBuf> = Lazy::new(|| match env::var("TEMP_FILES_DIR") {
    Ok(dir) if !dir.trim().is_empty() => expand_tilde(&dir),
    _ => env::temp_dir(),
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: tubefetch.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "tubefetch.log".to_string()));

/// Log level name (error, warn, info, debug, trace)
/// Read from LOG_LEVEL environment variable
/// Default: info
pub static LOG_LEVEL: Lazy<String> = Lazy::new(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

/// Download configuration
pub mod download {
    use super::Duration;
    use once_cell::sync::Lazy;

    /// Timeout for the title probe (in seconds)
    pub const PROBE_TIMEOUT_SECS: u64 = 120;

    /// Default timeout for a whole download (in seconds), long enough for 4K merges
    pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 1800;

    /// Download timeout, overridable via YTDLP_TIMEOUT_SECS
    pub static DOWNLOAD_TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
        std::env::var("YTDLP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT_SECS)
    });

    /// Container used when merging separate video and audio streams
    pub const VIDEO_CONTAINER: &str = "mp4";

    /// Codec the audio post-processor transcodes into
    pub const AUDIO_CODEC: &str = "mp3";

    /// Target audio bitrate in kbps
    pub const AUDIO_BITRATE_KBPS: u32 = 192;

    /// Name used when a title sanitizes down to nothing
    pub const PLACEHOLDER_NAME: &str = "download";

    /// Prefix of per-fetch workspace directories
    pub const WORKSPACE_PREFIX: &str = "tubefetch-";

    /// Probe timeout duration
    pub fn probe_timeout() -> Duration {
        Duration::from_secs(PROBE_TIMEOUT_SECS)
    }

    /// Download timeout duration
    pub fn download_timeout() -> Duration {
        Duration::from_secs(*DOWNLOAD_TIMEOUT_SECS)
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}
