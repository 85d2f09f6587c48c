//! Single-attempt transfer execution.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use coursedrop_protocol::constants::{CONTENT_TYPE_FIELD, CSRF_HEADER, FILE_FIELD};
use coursedrop_protocol::{ContentCategory, UploadAck};

use crate::config::UploaderConfig;
use crate::error::UploadError;
use crate::progress::AttemptProgress;
use crate::task::TransferTask;

/// Bytes handed to the transport per progress tick.
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Performs single network attempts for transfer tasks.
///
/// One executor is shared by all tasks of a manager; it holds the HTTP
/// client and the immutable configuration.
pub(crate) struct TransferExecutor {
    http: reqwest::Client,
    config: Arc<UploaderConfig>,
}

impl TransferExecutor {
    pub(crate) fn new(config: Arc<UploaderConfig>) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Runs exactly one attempt for `task`.
    ///
    /// Emits zero or more progress events through the task's channel,
    /// then resolves with the parsed acknowledgment or the attempt's
    /// failure. `started_at` is the task's first-attempt timestamp.
    pub(crate) async fn attempt(
        &self,
        task: &TransferTask,
        started_at: Instant,
    ) -> Result<UploadAck, UploadError> {
        let total = task.payload.size();
        let category = ContentCategory::from_filename(&task.payload.filename);
        let progress = AttemptProgress::new(total, started_at, task.events.clone());

        let body = reqwest::Body::wrap_stream(chunk_stream(task.payload.bytes.clone(), progress));
        let part = Part::stream_with_length(body, total).file_name(task.payload.filename.clone());
        let form = Form::new()
            .part(FILE_FIELD, part)
            .text(CONTENT_TYPE_FIELD, category.as_str());

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .timeout(self.config.attempt_timeout)
            .multipart(form);
        if let Some(token) = &self.config.csrf_token {
            request = request.header(CSRF_HEADER, token.as_str());
        }

        debug!(
            task = %task.id,
            attempt = task.attempt_count + 1,
            bytes = total,
            category = category.as_str(),
            "starting attempt"
        );

        let response = request.send().await.map_err(classify_send_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status(status.as_u16()));
        }

        let raw = response.bytes().await.map_err(classify_send_error)?;
        let ack: UploadAck = serde_json::from_slice(&raw)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        if !ack.success {
            let message = ack.error.unwrap_or_else(|| "upload failed".to_string());
            return Err(UploadError::Rejected(message));
        }

        debug!(task = %task.id, content_id = ack.content_id, "attempt succeeded");
        Ok(ack)
    }
}

/// Splits the payload into fixed-size chunks, driving the progress
/// counter as the transport pulls each one.
fn chunk_stream(
    bytes: Bytes,
    progress: AttemptProgress,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let total = bytes.len();
    let chunks = (0..total).step_by(STREAM_CHUNK_SIZE).map(move |start| {
        let end = usize::min(start + STREAM_CHUNK_SIZE, total);
        bytes.slice(start..end)
    });
    stream::iter(chunks).map(move |chunk| {
        progress.record(chunk.len() as u64);
        Ok(chunk)
    })
}

fn classify_send_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        UploadError::Timeout
    } else {
        UploadError::Transport(err.to_string())
    }
}
