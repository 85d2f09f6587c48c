//! Uploader configuration.

use std::time::Duration;

/// Configuration for an [`UploadManager`](crate::UploadManager) instance.
///
/// Immutable once the manager is constructed.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Destination URL for upload requests.
    pub endpoint: String,
    /// Validation ceiling in bytes; larger payloads are rejected before
    /// any network attempt.
    pub max_payload_size: u64,
    /// Retry ceiling. A task makes at most `max_retries + 1` attempts.
    pub max_retries: u32,
    /// Base backoff delay; the k-th retry waits `k × retry_base_delay`.
    pub retry_base_delay: Duration,
    /// Per-attempt bound. An attempt running past this duration fails
    /// and is eligible for retry.
    pub attempt_timeout: Duration,
    /// Admission permits: at most this many tasks touch the network at
    /// once, the rest wait in submission order.
    pub max_concurrent: usize,
    /// Anti-forgery token sent as the `X-CSRFToken` header when present.
    pub csrf_token: Option<String>,
    /// Extension allow-list (lowercase, without the dot). Empty means
    /// any extension is accepted.
    pub allowed_extensions: Vec<String>,
}

impl UploaderConfig {
    /// Creates a configuration with defaults for everything but the
    /// endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Delay before the `attempt`-th retry (1-based). Linear backoff:
    /// attempt 1 waits 1×, attempt 2 waits 2×.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.retry_base_delay.saturating_mul(attempt.max(1))
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            max_payload_size: 100 * 1024 * 1024,
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(60),
            max_concurrent: 3,
            csrf_token: None,
            allowed_extensions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = UploaderConfig::default();
        assert_eq!(config.max_payload_size, 100 * 1024 * 1024);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_base_delay, Duration::from_secs(1));
        assert_eq!(config.attempt_timeout, Duration::from_secs(60));
        assert_eq!(config.max_concurrent, 3);
        assert!(config.csrf_token.is_none());
        assert!(config.allowed_extensions.is_empty());
    }

    #[test]
    fn new_sets_endpoint_only() {
        let config = UploaderConfig::new("http://localhost:5000/upload");
        assert_eq!(config.endpoint, "http://localhost:5000/upload");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn backoff_is_linear() {
        let config = UploaderConfig {
            retry_base_delay: Duration::from_millis(100),
            ..UploaderConfig::default()
        };
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(300));
    }

    #[test]
    fn attempt_zero_clamps_to_base_delay() {
        let config = UploaderConfig::default();
        assert_eq!(config.delay_for_attempt(0), config.retry_base_delay);
    }
}
