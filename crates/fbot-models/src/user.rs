//! Persisted user records.

use serde::{Deserialize, Serialize};

/// A user seen by the bot, persisted in the registry.
///
/// `id` is the unique key; the other fields are overwritten on every
/// interaction (last write wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Telegram user id.
    pub id: i64,
    /// Username, or a placeholder when the account has none.
    pub username: String,
    /// Display name, or a placeholder when the account has none.
    pub first_name: String,
}

impl UserRecord {
    /// Create a record, substituting placeholders for missing fields.
    pub fn new(id: i64, username: Option<&str>, first_name: Option<&str>) -> Self {
        Self {
            id,
            username: username.unwrap_or("NoUsername").to_string(),
            first_name: first_name.unwrap_or("NoName").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_for_missing_fields() {
        let record = UserRecord::new(42, None, None);
        assert_eq!(record.username, "NoUsername");
        assert_eq!(record.first_name, "NoName");

        let record = UserRecord::new(42, Some("alice"), Some("Alice"));
        assert_eq!(record.username, "alice");
        assert_eq!(record.first_name, "Alice");
    }
}
