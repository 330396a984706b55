//! Callback token codec for deferred user choices.
//!
//! When a YouTube link arrives, the bot offers a video/audio choice via
//! inline keyboard buttons. The chosen action must be reconstructable from
//! the button's callback payload alone; no server-side session exists. The
//! token is a versioned, `|`-separated encoding that is validated field by
//! field on decode, so malformed input yields a typed error instead of an
//! ambiguous split.
//!
//! Wire format:
//!
//! ```text
//! help                        -> PendingAction::Help
//! v1|yt|video|<url>           -> PendingAction::Download { role: Video, url }
//! v1|yt|audio|<url>           -> PendingAction::Download { role: Audio, url }
//! ```
//!
//! Telegram caps callback payloads at 64 bytes; the encoder does not
//! truncate, so sufficiently long URLs will be rejected by the platform at
//! send time rather than silently corrupted here.

use thiserror::Error;

use crate::role::MediaRole;

/// Current token wire version.
pub const TOKEN_VERSION: &str = "v1";

/// Platform tag carried in download tokens. Format menus only exist for
/// YouTube links, so this is the only accepted tag.
const PLATFORM_TAG_YOUTUBE: &str = "yt";

/// Legacy payload for the help button on the start message.
const HELP_PAYLOAD: &str = "help";

/// A user choice deferred through an inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Show the usage text.
    Help,
    /// Download `url` as the given role.
    Download { role: MediaRole, url: String },
}

/// Errors produced when decoding a callback token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionDecodeError {
    #[error("empty callback token")]
    Empty,

    #[error("unknown token version: {0}")]
    UnknownVersion(String),

    #[error("unknown platform tag: {0}")]
    UnknownPlatform(String),

    #[error("unknown media role: {0}")]
    UnknownRole(String),

    #[error("token is missing the {0} field")]
    MissingField(&'static str),
}

impl PendingAction {
    /// Encode this action into a callback token.
    pub fn encode(&self) -> String {
        match self {
            PendingAction::Help => HELP_PAYLOAD.to_string(),
            PendingAction::Download { role, url } => format!(
                "{}|{}|{}|{}",
                TOKEN_VERSION,
                PLATFORM_TAG_YOUTUBE,
                role.as_str(),
                url
            ),
        }
    }
}

/// Decode a callback token back into a [`PendingAction`].
///
/// The decode is exact: the returned action round-trips to the same token
/// that produced it. Any field that fails validation is reported through
/// [`ActionDecodeError`].
pub fn decode_action(token: &str) -> Result<PendingAction, ActionDecodeError> {
    if token.is_empty() {
        return Err(ActionDecodeError::Empty);
    }

    if token == HELP_PAYLOAD {
        return Ok(PendingAction::Help);
    }

    let mut parts = token.splitn(4, '|');

    let version = parts.next().ok_or(ActionDecodeError::Empty)?;
    if version != TOKEN_VERSION {
        return Err(ActionDecodeError::UnknownVersion(version.to_string()));
    }

    let platform = parts
        .next()
        .ok_or(ActionDecodeError::MissingField("platform"))?;
    if platform != PLATFORM_TAG_YOUTUBE {
        return Err(ActionDecodeError::UnknownPlatform(platform.to_string()));
    }

    let role = match parts.next().ok_or(ActionDecodeError::MissingField("role"))? {
        "video" => MediaRole::Video,
        "audio" => MediaRole::Audio,
        other => return Err(ActionDecodeError::UnknownRole(other.to_string())),
    };

    let url = parts.next().ok_or(ActionDecodeError::MissingField("url"))?;
    if url.is_empty() {
        return Err(ActionDecodeError::MissingField("url"));
    }

    Ok(PendingAction::Download {
        role,
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_token_round_trip() {
        let action = PendingAction::Download {
            role: MediaRole::Video,
            url: "https://youtu.be/abc123".to_string(),
        };

        let token = action.encode();
        assert_eq!(token, "v1|yt|video|https://youtu.be/abc123");
        assert_eq!(decode_action(&token), Ok(action));
    }

    #[test]
    fn test_audio_token_round_trip() {
        let action = PendingAction::Download {
            role: MediaRole::Audio,
            url: "https://youtube.com/watch?v=abc123def45".to_string(),
        };

        assert_eq!(decode_action(&action.encode()), Ok(action));
    }

    #[test]
    fn test_url_with_separator_chars_survives() {
        // splitn(4) keeps everything after the third separator as the URL,
        // including literal pipes.
        let action = PendingAction::Download {
            role: MediaRole::Video,
            url: "https://youtu.be/a|b?t=1".to_string(),
        };

        assert_eq!(decode_action(&action.encode()), Ok(action));
    }

    #[test]
    fn test_help_round_trip() {
        assert_eq!(decode_action(&PendingAction::Help.encode()), Ok(PendingAction::Help));
    }

    #[test]
    fn test_malformed_tokens_yield_typed_errors() {
        assert_eq!(decode_action(""), Err(ActionDecodeError::Empty));
        assert_eq!(
            decode_action("v2|yt|video|https://youtu.be/abc"),
            Err(ActionDecodeError::UnknownVersion("v2".to_string()))
        );
        assert_eq!(
            decode_action("v1|vimeo|video|https://vimeo.com/1"),
            Err(ActionDecodeError::UnknownPlatform("vimeo".to_string()))
        );
        assert_eq!(
            decode_action("v1|yt|subtitles|https://youtu.be/abc"),
            Err(ActionDecodeError::UnknownRole("subtitles".to_string()))
        );
        assert_eq!(
            decode_action("v1|yt|video"),
            Err(ActionDecodeError::MissingField("url"))
        );
        assert_eq!(
            decode_action("v1|yt"),
            Err(ActionDecodeError::MissingField("role"))
        );
        assert_eq!(
            decode_action("v1|yt|video|"),
            Err(ActionDecodeError::MissingField("url"))
        );
    }

    #[test]
    fn test_unversioned_legacy_shape_is_rejected() {
        // The pre-redesign string-concatenated shape has no version field
        // and must not be silently misparsed.
        assert_eq!(
            decode_action("yt|mp4|https://youtu.be/abc"),
            Err(ActionDecodeError::UnknownVersion("yt".to_string()))
        );
    }
}
