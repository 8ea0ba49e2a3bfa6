use crate::core::config;

/// Characters that are unsafe in a file name on the most restrictive common target.
pub const FORBIDDEN_FILENAME_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Removes filesystem-unsafe characters from a title.
///
/// Every occurrence of `\ / * ? : " < > |` is deleted; all other characters
/// keep their order. No replacement character is inserted, whitespace is not
/// trimmed and Unicode is not normalized.
///
/// # Example
///
/// ```
/// use fetchcore::core::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("a:b/c*d"), "abcd");
/// assert_eq!(sanitize_filename("Live | Part 1"), "Live  Part 1");
/// ```
pub fn sanitize_filename(filename: &str) -> String {
    filename.chars().filter(|c| !FORBIDDEN_FILENAME_CHARS.contains(c)).collect()
}

/// Sanitized title usable as a file stem.
///
/// Falls back to [`config::download::PLACEHOLDER_NAME`] when the sanitized
/// title is empty or whitespace only. A blank stem would give a hidden or
/// nameless `.mp4`, so whitespace-only titles get the placeholder as well.
pub fn display_name(title: &str) -> String {
    let sanitized = sanitize_filename(title);
    if sanitized.trim().is_empty() {
        log::warn!(
            "Title {:?} is empty after sanitizing, using '{}'",
            title,
            config::download::PLACEHOLDER_NAME
        );
        config::download::PLACEHOLDER_NAME.to_string()
    } else {
        sanitized
    }
}

/// Escapes a literal path for use as a yt-dlp output template.
pub fn escape_output_template(path: &str) -> String {
    path.replace('%', "%%")
}
