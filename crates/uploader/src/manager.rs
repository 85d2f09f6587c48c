//! Public entry point: validation, registry, admission, lifecycle.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::UploaderConfig;
use crate::error::UploadError;
use crate::executor::TransferExecutor;
use crate::retry::RetryController;
use crate::task::{EVENT_CHANNEL_CAPACITY, TransferTask, UploadEvent, UploadHandle, UploadPayload};

/// Maps task ids to their cancellation tokens.
///
/// An id is present iff its transfer is still outstanding: inserted on
/// submission, removed exactly once on success, terminal failure, or
/// cancellation.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    inner: Arc<RwLock<HashMap<Uuid, CancellationToken>>>,
}

impl Registry {
    fn insert(&self, id: Uuid, cancel: CancellationToken) {
        self.inner.write().unwrap().insert(id, cancel);
    }

    pub(crate) fn remove(&self, id: &Uuid) -> Option<CancellationToken> {
        self.inner.write().unwrap().remove(id)
    }

    fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }
}

/// Snapshot of manager state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadStats {
    /// Tasks that are neither completed, terminally failed, nor
    /// cancelled.
    pub active: usize,
}

/// Orchestrates resilient uploads over one endpoint.
///
/// An explicitly constructed value over an injected [`UploaderConfig`];
/// owned by whichever component composes the application. Methods may be
/// called from any task; `submit` must run inside a Tokio runtime.
pub struct UploadManager {
    config: Arc<UploaderConfig>,
    registry: Registry,
    controller: Arc<RetryController>,
    admission: Arc<Semaphore>,
}

impl UploadManager {
    /// Creates a manager over the given configuration.
    pub fn new(config: UploaderConfig) -> Result<Self, UploadError> {
        let config = Arc::new(config);
        let executor = TransferExecutor::new(Arc::clone(&config))?;
        Ok(Self {
            admission: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            controller: Arc::new(RetryController::new(Arc::clone(&config), executor)),
            registry: Registry::default(),
            config,
        })
    }

    /// Validates and starts one upload.
    ///
    /// Returns immediately; completion is signaled through the handle's
    /// event stream. A validation failure is returned synchronously and
    /// leaves no trace: no task, no registry entry, no network traffic.
    pub fn submit(&self, payload: UploadPayload) -> Result<UploadHandle, UploadError> {
        self.validate(&payload)?;

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let task = TransferTask::new(payload, events_tx);
        let id = task.id;
        let cancel = CancellationToken::new();
        self.registry.insert(id, cancel.clone());

        info!(
            task = %id,
            file = %task.payload.filename,
            bytes = task.payload.size(),
            "upload submitted"
        );

        let controller = Arc::clone(&self.controller);
        let registry = self.registry.clone();
        let admission = Arc::clone(&self.admission);
        tokio::spawn(async move {
            // Queued tasks count as active, but only permit holders touch
            // the network.
            let permit = tokio::select! {
                _ = cancel.cancelled() => None,
                permit = admission.acquire_owned() => permit.ok(),
            };
            match permit {
                Some(_permit) => controller.run(task, cancel, registry).await,
                None => {
                    // Cancelled while queued; the terminal event still
                    // fires exactly once.
                    registry.remove(&task.id);
                    let _ = task.events.send(UploadEvent::Failed(UploadError::Cancelled)).await;
                }
            }
        });

        Ok(UploadHandle { id, events: events_rx })
    }

    /// Cancels a task by id.
    ///
    /// Idempotent: unknown or already-finished ids are a no-op. The
    /// task's driver delivers the terminal `Failed(Cancelled)` event and
    /// nothing after it; the registry entry is gone when this returns.
    pub fn cancel(&self, id: Uuid) {
        let Some(cancel) = self.registry.remove(&id) else {
            debug!(task = %id, "cancel: task not active");
            return;
        };
        cancel.cancel();
        info!(task = %id, "upload cancelled");
    }

    /// Returns a snapshot of manager state. No side effects.
    pub fn stats(&self) -> UploadStats {
        UploadStats {
            active: self.registry.len(),
        }
    }

    fn validate(&self, payload: &UploadPayload) -> Result<(), UploadError> {
        let size = payload.size();
        if size > self.config.max_payload_size {
            return Err(UploadError::PayloadTooLarge {
                size,
                limit: self.config.max_payload_size,
            });
        }
        if !self.config.allowed_extensions.is_empty() {
            let ext = payload
                .filename
                .rsplit_once('.')
                .map(|(_, e)| e.to_ascii_lowercase())
                .unwrap_or_default();
            let allowed = self
                .config
                .allowed_extensions
                .iter()
                .any(|a| a.eq_ignore_ascii_case(&ext));
            if !allowed {
                return Err(UploadError::DisallowedExtension(ext));
            }
        }
        Ok(())
    }
}
