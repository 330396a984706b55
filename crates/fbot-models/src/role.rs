//! Media role requested by the user.

use serde::{Deserialize, Serialize};

/// Whether a download should produce a video or an audio file.
///
/// The role drives the extraction format spec, the transcode settings, the
/// delivery-size threshold, and the attachment type used for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaRole {
    Video,
    Audio,
}

impl MediaRole {
    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaRole::Video => "video",
            MediaRole::Audio => "audio",
        }
    }

    /// File extension used for delivered artifacts of this role.
    pub fn file_ext(&self) -> &'static str {
        match self {
            MediaRole::Video => "mp4",
            MediaRole::Audio => "mp3",
        }
    }
}

impl std::fmt::Display for MediaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        assert_eq!(MediaRole::Video.as_str(), "video");
        assert_eq!(MediaRole::Audio.as_str(), "audio");
        assert_eq!(MediaRole::Video.file_ext(), "mp4");
        assert_eq!(MediaRole::Audio.file_ext(), "mp3");
    }
}
