//! Per-attempt progress reporting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::trace;

use crate::format::format_speed;
use crate::task::UploadEvent;

/// Snapshot of upload progress at one transport tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Whole-percent completion: `round(loaded / total × 100)`.
    pub percent: u32,
    /// Bytes handed to the transport so far in this attempt.
    pub loaded: u64,
    /// Total payload size in bytes.
    pub total: u64,
    /// Instantaneous rate, formatted (`"1.5 MB/s"`).
    pub speed: String,
    /// Milliseconds since the task's first attempt started.
    pub elapsed_ms: u64,
}

/// Shared counter driven by the streaming request body.
///
/// [`record`](Self::record) is called as the transport consumes chunks;
/// each call emits one `Progress` event. Within one attempt `loaded` is
/// non-decreasing. A fresh counter is created per attempt, so a retried
/// task restarts from zero.
#[derive(Clone)]
pub(crate) struct AttemptProgress {
    loaded: Arc<AtomicU64>,
    total: u64,
    started_at: Instant,
    events: mpsc::Sender<UploadEvent>,
}

impl AttemptProgress {
    pub(crate) fn new(total: u64, started_at: Instant, events: mpsc::Sender<UploadEvent>) -> Self {
        Self {
            loaded: Arc::new(AtomicU64::new(0)),
            total,
            started_at,
            events,
        }
    }

    /// Adds `bytes` to the counter and emits a progress event.
    ///
    /// Progress is dropped, not awaited, when the receiver lags; terminal
    /// events never pass through here.
    pub(crate) fn record(&self, bytes: u64) {
        let loaded = self.loaded.fetch_add(bytes, Ordering::Relaxed) + bytes;
        let update = self.snapshot(loaded);
        if let Err(e) = self.events.try_send(UploadEvent::Progress(update)) {
            trace!("progress event dropped: {e}");
        }
    }

    fn snapshot(&self, loaded: u64) -> ProgressUpdate {
        let elapsed = self.started_at.elapsed();
        let secs = elapsed.as_secs_f64();
        // Zero elapsed reports a zero rate rather than dividing by zero.
        let rate = if secs > 0.0 { loaded as f64 / secs } else { 0.0 };
        let percent = if self.total == 0 {
            100
        } else {
            ((loaded as f64 / self.total as f64) * 100.0).round() as u32
        };
        ProgressUpdate {
            percent,
            loaded,
            total: self.total,
            speed: format_speed(rate),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}
