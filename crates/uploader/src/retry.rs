//! Retry loop: drives executor attempts with linear backoff.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use coursedrop_protocol::UploadAck;

use crate::config::UploaderConfig;
use crate::error::UploadError;
use crate::executor::TransferExecutor;
use crate::manager::Registry;
use crate::task::{TransferTask, UploadEvent};

/// Drives a task's attempts until success, a non-retryable failure, an
/// exhausted retry ceiling, or cancellation.
pub(crate) struct RetryController {
    config: Arc<UploaderConfig>,
    executor: TransferExecutor,
}

impl RetryController {
    pub(crate) fn new(config: Arc<UploaderConfig>, executor: TransferExecutor) -> Self {
        Self { config, executor }
    }

    /// Runs the task to its terminal outcome and emits exactly one
    /// terminal event.
    ///
    /// The registry entry is removed before the event is sent, so the
    /// registry never names a task whose outcome has been delivered.
    pub(crate) async fn run(&self, mut task: TransferTask, cancel: CancellationToken, registry: Registry) {
        let id = task.id;
        let outcome = self.drive(&mut task, &cancel).await;
        registry.remove(&id);

        let event = match outcome {
            Ok(ack) => {
                info!(task = %id, attempts = task.attempt_count + 1, "upload complete");
                UploadEvent::Completed(ack)
            }
            Err(err) => {
                warn!(task = %id, error = %err, "upload failed");
                UploadEvent::Failed(err)
            }
        };
        let _ = task.events.send(event).await;
    }

    async fn drive(
        &self,
        task: &mut TransferTask,
        cancel: &CancellationToken,
    ) -> Result<UploadAck, UploadError> {
        loop {
            if cancel.is_cancelled() {
                return Err(UploadError::Cancelled);
            }
            let started_at = task.mark_started();

            // Dropping the attempt future aborts the in-flight request,
            // so no progress event outlives a cancellation.
            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                result = self.executor.attempt(task, started_at) => result,
            };

            let err = match result {
                Ok(ack) => return Ok(ack),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if task.attempt_count >= self.config.max_retries => {
                    debug!(task = %task.id, "retry budget exhausted");
                    return Err(err);
                }
                Err(err) => err,
            };

            task.attempt_count += 1;
            let delay = self.config.delay_for_attempt(task.attempt_count);
            warn!(
                task = %task.id,
                attempt = task.attempt_count,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "attempt failed, retrying"
            );

            tokio::select! {
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
