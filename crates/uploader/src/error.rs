//! Upload error taxonomy.

/// Errors produced by the upload subsystem.
///
/// Validation variants are returned synchronously from
/// [`submit`](crate::UploadManager::submit); the rest arrive as the
/// terminal [`Failed`](crate::UploadEvent::Failed) event. The `Display`
/// text is always human-readable.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("payload too large: {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("file type not allowed: .{0}")]
    DisallowedExtension(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("attempt timed out")]
    Timeout,

    #[error("server returned status {0}")]
    Status(u16),

    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("cancelled")]
    Cancelled,
}

impl UploadError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transient transport conditions and server-side overload (5xx, 408,
    /// 429) retry; deterministic rejections do not, since resending an
    /// unchanged payload cannot heal them.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout | Self::InvalidResponse(_) => true,
            Self::Status(code) => *code >= 500 || *code == 408 || *code == 429,
            Self::PayloadTooLarge { .. }
            | Self::DisallowedExtension(_)
            | Self::Rejected(_)
            | Self::Cancelled => false,
        }
    }
}
