//! SQLite-backed user store.
//!
//! Every operation opens its own connection and runs a single atomic
//! statement, so concurrent requests need no external locking: upserts to
//! different ids are independent and repeated upserts to the same id apply
//! last-write-wins in arrival order. rusqlite is synchronous, so calls are
//! dispatched to the blocking pool.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::debug;

use fbot_models::UserRecord;

use crate::error::{RegistryError, RegistryResult};

/// Handle to the persisted user registry.
///
/// Cheap to clone; holds only the database path.
#[derive(Debug, Clone)]
pub struct UserRegistry {
    db_path: PathBuf,
}

impl UserRegistry {
    /// Create a handle for the registry at `db_path`.
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Create the users table if it does not exist.
    pub async fn init(&self) -> RegistryResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    user_id INTEGER PRIMARY KEY,
                    username TEXT NOT NULL,
                    first_name TEXT NOT NULL
                )",
                [],
            )?;
            Ok(())
        })
        .await
    }

    /// Insert or overwrite the non-key fields of a user record.
    pub async fn upsert(&self, record: UserRecord) -> RegistryResult<()> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (user_id, username, first_name)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET
                     username = excluded.username,
                     first_name = excluded.first_name",
                params![record.id, record.username, record.first_name],
            )?;
            debug!(user_id = record.id, "Upserted user");
            Ok(())
        })
        .await
    }

    /// List every registered user.
    pub async fn list_all(&self) -> RegistryResult<Vec<UserRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT user_id, username, first_name FROM users")?;
            let rows = stmt.query_map([], |row| {
                Ok(UserRecord {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    first_name: row.get(2)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
    }

    /// Number of registered users.
    pub async fn count(&self) -> RegistryResult<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    /// Open a connection, run `f`, and close it on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> RegistryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> RegistryResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            // Writers from other requests may hold the file briefly.
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            f(&conn)
        })
        .await
        .map_err(|e| RegistryError::task_failed(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_registry(dir: &TempDir) -> UserRegistry {
        UserRegistry::new(dir.path().join("users.db"))
    }

    #[tokio::test]
    async fn test_upsert_and_list() {
        let dir = TempDir::new().unwrap();
        let registry = test_registry(&dir);
        registry.init().await.unwrap();

        registry
            .upsert(UserRecord::new(1, Some("alice"), Some("Alice")))
            .await
            .unwrap();
        registry
            .upsert(UserRecord::new(2, Some("bob"), Some("Bob")))
            .await
            .unwrap();

        let mut users = registry.list_all().await.unwrap();
        users.sort_by_key(|u| u.id);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[1].username, "bob");
        assert_eq!(registry.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_upsert_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let registry = test_registry(&dir);
        registry.init().await.unwrap();

        registry
            .upsert(UserRecord::new(1, Some("old_name"), Some("Old")))
            .await
            .unwrap();
        registry
            .upsert(UserRecord::new(1, Some("new_name"), Some("New")))
            .await
            .unwrap();

        let users = registry.list_all().await.unwrap();
        assert_eq!(users.len(), 1, "exactly one record per id");
        assert_eq!(users[0].username, "new_name");
        assert_eq!(users[0].first_name, "New");
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let registry = test_registry(&dir);
        registry.init().await.unwrap();
        registry.init().await.unwrap();
        assert_eq!(registry.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_to_different_ids() {
        let dir = TempDir::new().unwrap();
        let registry = test_registry(&dir);
        registry.init().await.unwrap();

        let mut handles = Vec::new();
        for id in 0..10i64 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .upsert(UserRecord::new(id, Some("user"), Some("User")))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(registry.count().await.unwrap(), 10);
    }
}
