use std::path::Path;
use std::sync::Mutex;

use registration_common::UserRecord;
use rusqlite::{params, Connection, OptionalExtension};

use super::{StoreError, UserStore};

/// SQLite-backed user store.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteUserStore {
    pub fn open(database_url: &str, table: &str) -> Result<Self, StoreError> {
        validate_table_name(table)?;

        // Parse sqlite: prefix if present
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
            Connection::open(path)
        }
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    user_id TEXT PRIMARY KEY NOT NULL,
                    email_addr TEXT NOT NULL,
                    username TEXT NOT NULL,
                    paying_user INTEGER NOT NULL DEFAULT 0,
                    created_ts INTEGER NOT NULL
                )"
            ),
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!("User store initialized with database: {} (table {})", path, table);

        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl UserStore for SqliteUserStore {
    fn put_if_absent(&self, record: &UserRecord) -> Result<(), StoreError> {
        let conn = self.lock()?;

        // A single statement, so the existence check and the write cannot race.
        let inserted = conn
            .execute(
                &format!(
                    "INSERT INTO {} (user_id, email_addr, username, paying_user, created_ts)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(user_id) DO NOTHING",
                    self.table
                ),
                params![
                    record.user_id,
                    record.email_addr,
                    record.username,
                    record.paying_user,
                    record.created_ts,
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if inserted == 0 {
            return Err(StoreError::ConditionFailed {
                user_id: record.user_id.clone(),
            });
        }

        tracing::debug!("Inserted user: {}", record.user_id);
        Ok(())
    }

    fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let conn = self.lock()?;

        conn.query_row(
            &format!(
                "SELECT user_id, email_addr, username, paying_user, created_ts FROM {} WHERE user_id = ?1",
                self.table
            ),
            params![user_id],
            |row| {
                Ok(UserRecord {
                    user_id: row.get(0)?,
                    email_addr: row.get(1)?,
                    username: row.get(2)?,
                    paying_user: row.get::<_, i32>(3)? != 0,
                    created_ts: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
                row.get(0)
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(count as u64)
    }
}

/// Table names are spliced into SQL, so only plain identifiers are accepted.
fn validate_table_name(table: &str) -> Result<(), StoreError> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTable(table.to_string()))
    }
}
