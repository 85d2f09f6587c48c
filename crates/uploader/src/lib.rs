//! Resilient upload client for the coursedrop content endpoint.
//!
//! Moves large binary payloads (lecture videos, documents, presentations)
//! to an HTTP endpoint under degraded network conditions: live progress
//! reporting, automatic retry with linear backoff, cancellation, and
//! bounded concurrency so a resource-limited backend is never flooded.
//!
//! [`UploadManager`] is the single entry point. `submit` validates the
//! payload, registers a task and returns an [`UploadHandle`] immediately;
//! the handle's event stream yields zero or more
//! [`Progress`](UploadEvent::Progress) events followed by exactly one
//! terminal [`Completed`](UploadEvent::Completed) or
//! [`Failed`](UploadEvent::Failed).

mod config;
mod error;
mod executor;
mod format;
mod manager;
mod progress;
mod retry;
mod task;

pub use config::UploaderConfig;
pub use error::UploadError;
pub use format::{format_size, format_speed};
pub use manager::{UploadManager, UploadStats};
pub use progress::ProgressUpdate;
pub use task::{UploadEvent, UploadHandle, UploadPayload};

pub use coursedrop_protocol::{ContentCategory, UploadAck};
