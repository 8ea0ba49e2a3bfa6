//! Classification of yt-dlp failures.
//!
//! yt-dlp reports every failure as free text on stderr. The orchestrator does
//! not branch on the cause, but logs and user-facing reasons are far more
//! useful with a coarse category attached.

/// Coarse category of a yt-dlp failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// Private, deleted, region-locked or age-gated media
    VideoUnavailable,
    /// URL not recognized by any extractor
    UnsupportedUrl,
    /// Site blocked the request (HTTP 403, sign-in wall, bot check)
    Blocked,
    /// Timeouts, DNS, refused connections
    NetworkError,
    /// ffmpeg merge or audio extraction failed
    PostprocessingError,
    /// Anything else
    Unknown,
}

/// Analyzes yt-dlp stderr and determines the error type
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
        || stderr_lower.contains("not available in your country")
        || stderr_lower.contains("confirm your age")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("unsupported url") || stderr_lower.contains("is not a valid url") {
        return YtDlpErrorType::UnsupportedUrl;
    }

    if stderr_lower.contains("http error 403")
        || stderr_lower.contains("sign in to confirm")
        || stderr_lower.contains("please sign in")
        || stderr_lower.contains("http error 429")
    {
        return YtDlpErrorType::Blocked;
    }

    if stderr_lower.contains("postprocessing")
        || stderr_lower.contains("ffmpeg not found")
        || stderr_lower.contains("ffprobe and ffmpeg not found")
    {
        return YtDlpErrorType::PostprocessingError;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("timeout")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network is unreachable")
        || stderr_lower.contains("name or service not known")
        || stderr_lower.contains("failed to resolve")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Returns a user-facing description of the error type
pub fn get_error_message(error_type: YtDlpErrorType) -> &'static str {
    match error_type {
        YtDlpErrorType::VideoUnavailable => {
            "Video is unavailable. It may be private, deleted or blocked in your region."
        }
        YtDlpErrorType::UnsupportedUrl => "This URL is not supported.",
        YtDlpErrorType::Blocked => "The site refused the request. Try again later.",
        YtDlpErrorType::NetworkError => "Network problem while contacting the site.",
        YtDlpErrorType::PostprocessingError => "Post-processing failed. Is ffmpeg installed?",
        YtDlpErrorType::Unknown => "Could not download the media. Check that the URL is correct.",
    }
}

/// Last `ERROR:` line yt-dlp printed, without the prefix.
pub fn last_error_line(stderr: &str) -> Option<&str> {
    stderr
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("ERROR:"))
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Reason surfaced to the caller: category description plus yt-dlp's own words.
pub fn describe_failure(stderr: &str) -> String {
    let error_type = analyze_ytdlp_error(stderr);
    let description = get_error_message(error_type);
    match last_error_line(stderr) {
        Some(detail) => format!("{} ({})", description, detail),
        None => description.to_string(),
    }
}
