use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Errors raised while building a user record.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("User ID must not be empty")]
    EmptyUserId,
}

/// User profile row created when an account is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Primary key, the identity provider's `sub`
    pub user_id: String,
    /// Email the user registered with
    pub email_addr: String,
    /// Preferred username, or the email when none was given
    pub username: String,
    /// Whether the user has a paid plan
    pub paying_user: bool,
    /// Creation time in milliseconds since the Unix epoch
    pub created_ts: i64,
}

impl UserRecord {
    pub fn new(
        user_id: &str,
        email: &str,
        preferred_username: Option<&str>,
        created_ts: i64,
    ) -> Result<Self, RecordError> {
        if user_id.is_empty() {
            return Err(RecordError::EmptyUserId);
        }

        let username = preferred_username
            .filter(|name| !name.is_empty())
            .unwrap_or(email);

        Ok(Self {
            user_id: user_id.to_string(),
            email_addr: email.to_string(),
            username: username.to_string(),
            paying_user: false,
            created_ts,
        })
    }

    /// Build a record stamped with the current time.
    pub fn registered_now(
        user_id: &str,
        email: &str,
        preferred_username: Option<&str>,
    ) -> Result<Self, RecordError> {
        Self::new(user_id, email, preferred_username, Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_uses_preferred_username() {
        let record = UserRecord::new("u-1", "user@example.com", Some("displayHandle"), 1_700_000_000_000)
            .unwrap();
        assert_eq!(record.user_id, "u-1");
        assert_eq!(record.email_addr, "user@example.com");
        assert_eq!(record.username, "displayHandle");
        assert!(!record.paying_user);
        assert_eq!(record.created_ts, 1_700_000_000_000);
    }

    #[test]
    fn test_username_falls_back_to_email() {
        let absent = UserRecord::new("u-1", "user@example.com", None, 0).unwrap();
        assert_eq!(absent.username, "user@example.com");

        let empty = UserRecord::new("u-1", "user@example.com", Some(""), 0).unwrap();
        assert_eq!(empty.username, "user@example.com");
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let err = UserRecord::new("", "user@example.com", None, 0).unwrap_err();
        assert_eq!(err, RecordError::EmptyUserId);
    }

    #[test]
    fn test_registered_now_stamps_current_time() {
        let before = Utc::now().timestamp_millis();
        let record = UserRecord::registered_now("u-1", "user@example.com", None).unwrap();
        let after = Utc::now().timestamp_millis();
        assert!(record.created_ts >= before && record.created_ts <= after);
    }

    #[test]
    fn test_record_serialization() {
        let record = UserRecord::new("u-1", "user@example.com", None, 5).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""user_id":"u-1""#));
        assert!(json.contains(r#""paying_user":false"#));
        assert!(json.contains(r#""created_ts":5"#));
    }
}
