//! URL platform classification.
//!
//! Classification is a pure substring check against fixed host fragment
//! lists, evaluated in priority order. It deliberately does not parse the
//! URL: the extraction tool is the authority on whether a link is actually
//! downloadable, this step only routes the request.

use serde::{Deserialize, Serialize};

/// Host fragments that mark a URL as YouTube.
const YOUTUBE_FRAGMENTS: &[&str] = &["youtube.com", "youtu.be"];

/// Host fragments that mark a URL as a short-form video platform.
const SHORT_FORM_FRAGMENTS: &[&str] = &[
    "tiktok.com",
    "facebook.com",
    "fb.watch",
    "instagram.com",
    "reel",
];

/// Platform category of an inbound URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// YouTube link: the user picks video or audio before download.
    YouTube,
    /// Short-form platform (TikTok, Facebook, Instagram): downloaded
    /// immediately as video.
    ShortForm,
    /// Not a platform we handle; terminal rejection.
    Unsupported,
}

impl Platform {
    /// Get string representation of the platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::ShortForm => "short_form",
            Platform::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a raw URL string into a [`Platform`].
///
/// Matching is case-sensitive and runs in fixed priority order: YouTube
/// fragments are checked before short-form fragments, so a URL matching
/// both categories classifies as YouTube.
pub fn classify_url(url: &str) -> Platform {
    if YOUTUBE_FRAGMENTS.iter().any(|frag| url.contains(frag)) {
        return Platform::YouTube;
    }

    if SHORT_FORM_FRAGMENTS.iter().any(|frag| url.contains(frag)) {
        return Platform::ShortForm;
    }

    Platform::Unsupported
}
