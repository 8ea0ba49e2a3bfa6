//! YtDlpEngine against a fake yt-dlp executable
//!
//! The fake is a shell script that understands just enough of the yt-dlp
//! command line to answer a title probe, print progress through the
//! progress template and write the output file.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg(unix)]

use fetchcore::download::{FetchOrchestrator, FetchRequest, FetchResult, ProgressPhase, QualityTier, YtDlpEngine};
use pretty_assertions::assert_eq;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const FAKE_YTDLP: &str = r#"#!/bin/sh
out=""
ext="mp4"
probe=0
url=""
while [ $# -gt 0 ]; do
    case "$1" in
        --print) probe=1; shift 2 ;;
        -o) out="$2"; shift 2 ;;
        --extract-audio) ext="mp3"; shift ;;
        --progress-template|--format|--merge-output-format|--audio-format|--audio-quality) shift 2 ;;
        *) url="$1"; shift ;;
    esac
done

case "$url" in
    *unsupported*)
        echo "ERROR: Unsupported URL: $url" >&2
        exit 1
        ;;
esac

if [ "$probe" = "1" ]; then
    case "$url" in
        *padded*) echo "  Padded Title  " ;;
        *) echo "Fake Title: Part 1" ;;
    esac
    exit 0
fi

file=$(printf '%s' "$out" | sed "s/\.%(ext)s\$/.$ext/")
echo "[info] Downloading 1 format(s)"
case "$url" in
    *latin1*)
        printf '[download] Destination: \377\376 clip\n'
        printf 'WARNING: \377 odd bytes\n' >&2
        sleep 0.2
        ;;
esac
echo "tubefetch-progress 512 1024 NA downloading"
echo "tubefetch-progress 1024 1024 NA downloading"
echo "tubefetch-progress 1024 1024 NA finished"
printf 'fake media' > "$file"
exit 0
"#;

fn install_fake_ytdlp(dir: &Path) -> PathBuf {
    let path = dir.join("fake-yt-dlp");
    std::fs::write(&path, FAKE_YTDLP).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn test_fake_ytdlp_probe_download_and_failure() {
    let bin_dir = tempfile::tempdir().unwrap();
    let workspace_root = tempfile::tempdir().unwrap();
    let bin = install_fake_ytdlp(bin_dir.path());

    let engine = YtDlpEngine::new()
        .with_binary(bin.to_string_lossy().to_string())
        .with_timeouts(Duration::from_secs(30), Duration::from_secs(30));
    let orchestrator = FetchOrchestrator::new(engine).with_workspace_root(workspace_root.path());

    // Video
    let request = FetchRequest::video("https://www.youtube.com/watch?v=abc", QualityTier::P720).unwrap();
    let mut events = Vec::new();
    let result = orchestrator.fetch(&request, |e| events.push(e)).await;

    match &result {
        FetchResult::Success {
            content, display_name, ..
        } => {
            assert_eq!(content.as_slice(), b"fake media");
            assert_eq!(display_name, "Fake Title Part 1");
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert!(events.windows(2).all(|w| w[0].bytes_done <= w[1].bytes_done));
    assert_eq!(events.first().map(|e| e.phase), Some(ProgressPhase::Downloading));
    assert_eq!(events.last().map(|e| e.phase), Some(ProgressPhase::Complete));
    assert_eq!(events.last().map(|e| e.bytes_done), Some(1024));

    // Audio
    let request = FetchRequest::audio("https://www.youtube.com/watch?v=abc").unwrap();
    let result = orchestrator.fetch(&request, |_| {}).await;
    assert_eq!(result.file_name().as_deref(), Some("Fake Title Part 1.mp3"));

    // Non-UTF-8 output from yt-dlp must not stop the pipes being drained
    let request = FetchRequest::video("https://www.youtube.com/watch?v=latin1", QualityTier::P720).unwrap();
    let mut events = Vec::new();
    let result = orchestrator.fetch(&request, |e| events.push(e)).await;
    assert!(result.is_success(), "{:?}", result.reason());
    assert_eq!(events.first().map(|e| e.bytes_done), Some(512));
    assert_eq!(events.last().map(|e| e.phase), Some(ProgressPhase::Complete));

    // Title is used verbatim apart from the line terminator
    let request = FetchRequest::video("https://www.youtube.com/watch?v=padded", QualityTier::P720).unwrap();
    let result = orchestrator.fetch(&request, |_| {}).await;
    assert_eq!(result.file_name().as_deref(), Some("  Padded Title  .mp4"));

    // Failure
    let request = FetchRequest::video("https://example.com/unsupported", QualityTier::P720).unwrap();
    let result = orchestrator.fetch(&request, |_| {}).await;
    let reason = result.reason().unwrap();
    assert!(reason.starts_with("This URL is not supported."), "{reason}");
    assert!(reason.contains("Unsupported URL: https://example.com/unsupported"), "{reason}");

    let leftovers: Vec<_> = std::fs::read_dir(workspace_root.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "workspace left behind");
}
