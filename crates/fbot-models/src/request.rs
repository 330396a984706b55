//! Download request descriptor.

use crate::platform::Platform;
use crate::role::MediaRole;

/// One resolved download request, created per inbound message or decoded
/// callback and consumed exactly once by the pipeline. Never persisted.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Source URL.
    pub url: String,
    /// Chat to deliver into.
    pub chat_id: i64,
    /// Requested output role.
    pub role: MediaRole,
    /// Platform category the URL classified as.
    pub platform: Platform,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, chat_id: i64, role: MediaRole, platform: Platform) -> Self {
        Self {
            url: url.into(),
            chat_id,
            role,
            platform,
        }
    }
}
