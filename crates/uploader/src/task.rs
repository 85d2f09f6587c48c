//! Transfer task state and the caller-facing handle.

use std::time::Instant;

use bytes::Bytes;
use tokio::sync::mpsc;
use uuid::Uuid;

use coursedrop_protocol::UploadAck;

use crate::error::UploadError;
use crate::progress::ProgressUpdate;

/// Capacity of a task's event channel. Progress events are dropped when
/// the receiver lags this far behind; terminal events are awaited.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Binary payload for one upload.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Filename presented to the server; drives content classification.
    pub filename: String,
    /// File contents. Never mutated; re-sent whole on every attempt.
    pub bytes: Bytes,
}

impl UploadPayload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Events delivered for one task: zero or more `Progress`, then exactly
/// one terminal `Completed` or `Failed`.
#[derive(Debug)]
pub enum UploadEvent {
    Progress(ProgressUpdate),
    Completed(UploadAck),
    Failed(UploadError),
}

impl UploadEvent {
    /// Whether this event ends the stream for its task.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Caller-facing handle returned by [`submit`](crate::UploadManager::submit).
#[derive(Debug)]
pub struct UploadHandle {
    /// Task id, usable with [`cancel`](crate::UploadManager::cancel).
    pub id: Uuid,
    /// Per-task event stream.
    pub events: mpsc::Receiver<UploadEvent>,
}

/// One in-flight upload, spanning one or more attempts.
///
/// Owned by its retry controller; only the attempt counter mutates after
/// construction. Never reused across files.
pub(crate) struct TransferTask {
    pub(crate) id: Uuid,
    pub(crate) payload: UploadPayload,
    /// Failed attempts so far, bounded by the configured retry ceiling.
    pub(crate) attempt_count: u32,
    /// Set when the first attempt starts; speed and elapsed time are
    /// measured from here across all attempts.
    started_at: Option<Instant>,
    pub(crate) events: mpsc::Sender<UploadEvent>,
}

impl TransferTask {
    pub(crate) fn new(payload: UploadPayload, events: mpsc::Sender<UploadEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            attempt_count: 0,
            started_at: None,
            events,
        }
    }

    /// Timestamp of the first attempt, set on first call and immutable
    /// afterwards.
    pub(crate) fn mark_started(&mut self) -> Instant {
        *self.started_at.get_or_insert_with(Instant::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> TransferTask {
        let (tx, _rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        TransferTask::new(UploadPayload::new("lecture.mp4", vec![0u8; 16]), tx)
    }

    #[test]
    fn payload_size() {
        let payload = UploadPayload::new("notes.pdf", vec![0u8; 1024]);
        assert_eq!(payload.size(), 1024);
    }

    #[test]
    fn task_ids_are_unique() {
        assert_ne!(sample_task().id, sample_task().id);
    }

    #[test]
    fn mark_started_is_sticky() {
        let mut task = sample_task();
        let first = task.mark_started();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(task.mark_started(), first);
    }

    #[test]
    fn terminal_classification() {
        let progress = UploadEvent::Progress(ProgressUpdate {
            percent: 0,
            loaded: 0,
            total: 1,
            speed: "0 Bytes/s".into(),
            elapsed_ms: 0,
        });
        assert!(!progress.is_terminal());
        assert!(UploadEvent::Failed(UploadError::Cancelled).is_terminal());
        assert!(
            UploadEvent::Completed(UploadAck {
                success: true,
                error: None,
                content_id: None,
                url: None,
            })
            .is_terminal()
        );
    }
}
