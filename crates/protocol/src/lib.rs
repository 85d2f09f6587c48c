//! Wire contract shared with the coursedrop upload endpoint.
//!
//! Multipart field names, the anti-forgery header, the content-category
//! enum and the acknowledgment schema the server speaks. No I/O lives
//! here.

pub mod constants;
pub mod types;

pub use types::{ContentCategory, UploadAck};
