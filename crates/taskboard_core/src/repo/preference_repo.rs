//! Local key/value preferences backed by SQLite.
//!
//! # Responsibility
//! - Remember client-side choices (selected user) across runs.
//!
//! # Invariants
//! - One value per key; `set` overwrites.
//! - Values are never sent to the backend.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};

/// Key under which the selected user id is stored.
pub const CURRENT_USER_KEY: &str = "currentUserId";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("required table `{0}` is missing; run migrations first")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local preference storage.
pub trait PreferenceRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Returns whether a value was removed.
    fn remove(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed preference repository owning its connection.
pub struct SqlitePreferenceRepository {
    conn: Connection,
}

impl SqlitePreferenceRepository {
    /// Wraps a migrated connection.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'preferences'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable("preferences"));
        }
        Ok(Self { conn })
    }
}

impl PreferenceRepository for SqlitePreferenceRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM preferences WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        PreferenceRepository, RepoError, SqlitePreferenceRepository, CURRENT_USER_KEY,
    };
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn set_overwrites_and_remove_clears() {
        let repo = SqlitePreferenceRepository::try_new(open_db_in_memory().unwrap()).unwrap();
        assert_eq!(repo.get(CURRENT_USER_KEY).unwrap(), None);

        repo.set(CURRENT_USER_KEY, "u1").unwrap();
        repo.set(CURRENT_USER_KEY, "u2").unwrap();
        assert_eq!(repo.get(CURRENT_USER_KEY).unwrap().as_deref(), Some("u2"));

        assert!(repo.remove(CURRENT_USER_KEY).unwrap());
        assert!(!repo.remove(CURRENT_USER_KEY).unwrap());
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqlitePreferenceRepository::try_new(conn).err().unwrap();
        assert!(matches!(err, RepoError::MissingRequiredTable("preferences")));
    }
}
