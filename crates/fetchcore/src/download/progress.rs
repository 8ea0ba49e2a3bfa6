//! Progress reporting: engine notifications in, `ProgressEvent`s out.

use serde::{Deserialize, Serialize};

/// Status the engine attaches to each native notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// A stream is being transferred
    Downloading,
    /// One stream finished (video and audio are separate streams before a merge)
    Finished,
    /// Anything else the engine reports (errors, post-processing)
    Other,
}

/// Native progress notification emitted by an extraction engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineProgress {
    pub status: EngineStatus,
    pub downloaded_bytes: Option<u64>,
    pub total_bytes: Option<u64>,
    pub total_bytes_estimate: Option<u64>,
}

impl EngineProgress {
    pub fn downloading(downloaded_bytes: u64, total_bytes: Option<u64>) -> Self {
        Self {
            status: EngineStatus::Downloading,
            downloaded_bytes: Some(downloaded_bytes),
            total_bytes,
            total_bytes_estimate: None,
        }
    }

    pub fn finished(downloaded_bytes: u64) -> Self {
        Self {
            status: EngineStatus::Finished,
            downloaded_bytes: Some(downloaded_bytes),
            total_bytes: Some(downloaded_bytes),
            total_bytes_estimate: None,
        }
    }

    /// Exact total when known, otherwise the engine's estimate.
    pub fn total(&self) -> Option<u64> {
        self.total_bytes.or(self.total_bytes_estimate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressPhase {
    /// Transfer in progress with a known total
    Downloading,
    /// Everything is on disk and loaded
    Complete,
    /// Transfer in progress, total not known
    Unknown,
}

/// Progress as seen by the caller of `fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    pub bytes_done: u64,
    pub bytes_total: Option<u64>,
}

impl ProgressEvent {
    /// Fraction in `[0, 1]`; `None` while the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        match (self.phase, self.bytes_total) {
            (ProgressPhase::Complete, _) => Some(1.0),
            (_, Some(total)) if total > 0 => Some((self.bytes_done as f64 / total as f64).clamp(0.0, 1.0)),
            _ => None,
        }
    }
}

/// Folds engine notifications into monotonic `ProgressEvent`s.
///
/// A merged video download reports two streams, each counting up from zero.
/// Finished streams are accumulated into a base offset so `bytes_done`
/// never goes backwards within one fetch.
pub struct ProgressReporter<F>
where
    F: FnMut(ProgressEvent),
{
    on_progress: F,
    base: u64,
    stream_done: u64,
    stream_total: Option<u64>,
    last: Option<ProgressEvent>,
}

impl<F> ProgressReporter<F>
where
    F: FnMut(ProgressEvent),
{
    pub fn new(on_progress: F) -> Self {
        Self {
            on_progress,
            base: 0,
            stream_done: 0,
            stream_total: None,
            last: None,
        }
    }

    /// Handle one native notification.
    pub fn observe(&mut self, progress: EngineProgress) {
        match progress.status {
            EngineStatus::Downloading => {
                let done = progress.downloaded_bytes.unwrap_or(self.stream_done);
                if done < self.stream_done {
                    // Counter restarted without a Finished marker: a new stream began
                    self.close_stream(None);
                }
                self.stream_done = done;
                if let Some(total) = progress.total() {
                    self.stream_total = Some(total);
                }
                self.emit_downloading();
            }
            EngineStatus::Finished => {
                let finished = progress.downloaded_bytes.or(progress.total());
                self.close_stream(finished);
            }
            EngineStatus::Other => {
                log::trace!("Ignoring engine progress {:?}", progress);
            }
        }
    }

    /// Emit the terminal `Complete` event and return it.
    pub fn complete(&mut self) -> ProgressEvent {
        let done = self.current_done();
        let total = self.last.and_then(|e| e.bytes_total).unwrap_or(0);
        let final_bytes = done.max(total);
        let event = ProgressEvent {
            phase: ProgressPhase::Complete,
            bytes_done: final_bytes,
            bytes_total: Some(final_bytes),
        };
        self.send(event);
        event
    }

    fn close_stream(&mut self, finished_bytes: Option<u64>) {
        let size = finished_bytes.map_or(self.stream_done, |bytes| bytes.max(self.stream_done));
        self.base = self.base.saturating_add(size);
        self.stream_done = 0;
        self.stream_total = None;
    }

    fn current_done(&self) -> u64 {
        let done = self.base.saturating_add(self.stream_done);
        self.last.map_or(done, |e| done.max(e.bytes_done))
    }

    fn emit_downloading(&mut self) {
        let bytes_done = self.current_done();
        let event = match self.stream_total {
            Some(total) => ProgressEvent {
                phase: ProgressPhase::Downloading,
                bytes_done,
                bytes_total: Some(self.base.saturating_add(total).max(bytes_done)),
            },
            None => ProgressEvent {
                phase: ProgressPhase::Unknown,
                bytes_done,
                bytes_total: None,
            },
        };
        self.send(event);
    }

    fn send(&mut self, event: ProgressEvent) {
        self.last = Some(event);
        (self.on_progress)(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(notifications: Vec<EngineProgress>) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        {
            let mut reporter = ProgressReporter::new(|e| events.push(e));
            for n in notifications {
                reporter.observe(n);
            }
            reporter.complete();
        }
        events
    }

    #[test]
    fn test_known_total_reports_fraction() {
        let events = collect(vec![
            EngineProgress::downloading(250, Some(1000)),
            EngineProgress::downloading(500, Some(1000)),
        ]);
        assert_eq!(events[0].phase, ProgressPhase::Downloading);
        assert_eq!(events[0].fraction(), Some(0.25));
        assert_eq!(events[1].fraction(), Some(0.5));
        let last = events.last().copied().unwrap();
        assert_eq!(last.phase, ProgressPhase::Complete);
        assert_eq!(last.bytes_done, 1000);
        assert_eq!(last.bytes_total, Some(1000));
    }

    #[test]
    fn test_unknown_total_has_no_fraction() {
        let events = collect(vec![EngineProgress {
            status: EngineStatus::Downloading,
            downloaded_bytes: Some(4096),
            total_bytes: None,
            total_bytes_estimate: None,
        }]);
        assert_eq!(events[0].phase, ProgressPhase::Unknown);
        assert_eq!(events[0].bytes_total, None);
        assert_eq!(events[0].fraction(), None);
        assert_eq!(events[1].phase, ProgressPhase::Complete);
        assert_eq!(events[1].bytes_done, 4096);
        assert_eq!(events[1].bytes_total, Some(4096));
    }

    #[test]
    fn test_estimate_used_when_exact_total_missing() {
        let events = collect(vec![EngineProgress {
            status: EngineStatus::Downloading,
            downloaded_bytes: Some(100),
            total_bytes: None,
            total_bytes_estimate: Some(400),
        }]);
        assert_eq!(events[0].phase, ProgressPhase::Downloading);
        assert_eq!(events[0].fraction(), Some(0.25));
    }

    #[test]
    fn test_two_streams_stay_monotonic() {
        let events = collect(vec![
            EngineProgress::downloading(600, Some(1000)),
            EngineProgress::downloading(1000, Some(1000)),
            EngineProgress::finished(1000),
            EngineProgress::downloading(50, Some(200)),
            EngineProgress::downloading(200, Some(200)),
            EngineProgress::finished(200),
        ]);
        let done: Vec<u64> = events.iter().map(|e| e.bytes_done).collect();
        assert_eq!(done, vec![600, 1000, 1050, 1200, 1200]);
        assert!(done.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(events[2].bytes_total, Some(1200));
        assert_eq!(events.last().map(|e| e.phase), Some(ProgressPhase::Complete));
    }

    #[test]
    fn test_counter_reset_without_finished_marker() {
        let events = collect(vec![
            EngineProgress::downloading(900, Some(900)),
            EngineProgress::downloading(10, Some(100)),
        ]);
        assert_eq!(events[0].bytes_done, 900);
        assert_eq!(events[1].bytes_done, 910);
        assert_eq!(events[1].bytes_total, Some(1000));
    }

    #[test]
    fn test_other_status_ignored() {
        let events = collect(vec![EngineProgress {
            status: EngineStatus::Other,
            downloaded_bytes: Some(5),
            total_bytes: Some(10),
            total_bytes_estimate: None,
        }]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, ProgressPhase::Complete);
        assert_eq!(events[0].bytes_done, 0);
        assert_eq!(events[0].fraction(), Some(1.0));
    }
}
