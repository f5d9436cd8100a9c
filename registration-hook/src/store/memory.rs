use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use registration_common::UserRecord;

use super::{StoreError, UserStore};

/// In-memory user store.
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for MemoryUserStore {
    fn put_if_absent(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut users = self
            .users
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match users.entry(record.user_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::ConditionFailed {
                user_id: record.user_id.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(users.get(user_id).cloned())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(users.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_duplicate_insert_keeps_first_record() {
        let store = MemoryUserStore::new();
        let first = UserRecord::new("u-1", "first@example.com", Some("first"), 1).unwrap();
        let second = UserRecord::new("u-1", "second@example.com", Some("second"), 2).unwrap();

        store.put_if_absent(&first).unwrap();
        let err = store.put_if_absent(&second).unwrap_err();

        assert!(matches!(err, StoreError::ConditionFailed { .. }));
        assert_eq!(store.get("u-1").unwrap(), Some(first));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_inserts_leave_one_row() {
        let store = Arc::new(MemoryUserStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    let record =
                        UserRecord::new("same-user", &format!("user{}@example.com", i), None, i)
                            .unwrap();
                    store.put_if_absent(&record).is_ok()
                })
            })
            .collect();

        let inserted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(inserted, 1);
        assert_eq!(store.count().unwrap(), 1);
    }
}
