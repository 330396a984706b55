//! Bot configuration.
//!
//! Loaded once at process start from the environment and passed into
//! components as an immutable value; nothing reads ambient global state
//! after startup.

use std::collections::HashSet;
use std::path::PathBuf;

use fbot_media::SizeLimits;

use crate::error::{BotError, BotResult};

/// Immutable bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot credential.
    pub bot_token: String,
    /// Static administrator allow-list.
    pub admin_ids: HashSet<u64>,
    /// Delivery-size thresholds.
    pub limits: SizeLimits,
    /// Parent directory for request workspaces.
    pub work_dir: PathBuf,
    /// Path of the user registry database.
    pub db_path: PathBuf,
    /// Maximum concurrently running download jobs.
    pub max_concurrent_jobs: usize,
}

impl BotConfig {
    /// Create config from environment variables.
    ///
    /// `BOT_TOKEN` and `ADMIN_IDS` are required; everything else has a
    /// default.
    pub fn from_env() -> BotResult<Self> {
        let bot_token = std::env::var("BOT_TOKEN")
            .map_err(|_| BotError::config("BOT_TOKEN is not set"))?;

        let admin_ids = std::env::var("ADMIN_IDS")
            .map_err(|_| BotError::config("ADMIN_IDS is not set"))
            .and_then(|raw| parse_admin_ids(&raw))?;

        let limits = SizeLimits {
            video_bytes: mb_env("MAX_VIDEO_MB", 50) * 1024 * 1024,
            audio_bytes: mb_env("MAX_AUDIO_MB", 20) * 1024 * 1024,
        };

        let work_dir = std::env::var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("fetchbot"));

        let db_path = std::env::var("DB_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("users.db"));

        let max_concurrent_jobs = std::env::var("MAX_CONCURRENT_JOBS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2);

        Ok(Self {
            bot_token,
            admin_ids,
            limits,
            work_dir,
            db_path,
            max_concurrent_jobs,
        })
    }

    /// Whether `user_id` is in the administrator allow-list.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

/// Parse a comma-separated administrator id list.
///
/// Empty input yields an empty set; any non-numeric entry is a
/// configuration error rather than a silently dropped admin.
pub fn parse_admin_ids(raw: &str) -> BotResult<HashSet<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| BotError::config(format!("invalid admin id: {part}")))
        })
        .collect()
}

fn mb_env(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids() {
        let ids = parse_admin_ids("123,456").unwrap();
        assert!(ids.contains(&123));
        assert!(ids.contains(&456));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_parse_admin_ids_tolerates_whitespace() {
        let ids = parse_admin_ids(" 123 , 456 ").unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_parse_admin_ids_empty() {
        assert!(parse_admin_ids("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_admin_ids_rejects_garbage() {
        assert!(parse_admin_ids("123,abc").is_err());
    }
}
