//! User store abstraction.
//!
//! The handler only ever needs one operation, a conditional insert. Adapters
//! must make that insert atomic: two concurrent inserts for the same
//! `user_id` must leave exactly one row and report `ConditionFailed` to the
//! loser.

mod memory;
mod sqlite;

pub use memory::MemoryUserStore;
pub use sqlite::SqliteUserStore;

use std::sync::Arc;

use registration_common::UserRecord;

use crate::config::{StorageBackend, StorageConfig};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A row with this user ID already exists. Not a failure for the hook.
    #[error("User already exists: {user_id}")]
    ConditionFailed { user_id: String },
    #[error("Database error: {0}")]
    Database(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid table name: {0}")]
    InvalidTable(String),
}

#[cfg_attr(test, mockall::automock)]
pub trait UserStore: Send + Sync {
    /// Insert `record` only if no row with its `user_id` exists.
    fn put_if_absent(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Look up a user by ID.
    fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Number of stored users.
    fn count(&self) -> Result<u64, StoreError>;
}

/// Open the store selected by `config`.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn UserStore>, StoreError> {
    match config.backend {
        StorageBackend::Sqlite => Ok(Arc::new(SqliteUserStore::open(&config.url, &config.table)?)),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory user store; users are lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}
