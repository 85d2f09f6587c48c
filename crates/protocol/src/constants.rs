//! Field and header names for the upload endpoint.

/// Multipart field carrying the binary payload.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the coarse content category.
pub const CONTENT_TYPE_FIELD: &str = "content_type";

/// Anti-forgery token header. Included when a token is configured,
/// omitted otherwise; a missing token is not an error.
pub const CSRF_HEADER: &str = "X-CSRFToken";
