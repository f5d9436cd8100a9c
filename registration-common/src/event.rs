//! Post-confirmation event payload.
//!
//! The identity provider sends an event shaped like
//! `{ "request": { "userAttributes": { "sub": ..., "email": ..., ... } } }`
//! alongside whatever other fields it needs echoed back. Only the identity
//! attributes are read here; the event itself is never modified.

use serde::Deserialize;
use serde_json::Value;

/// Errors raised while pulling identity attributes out of an event.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Field is not an object: {0}")]
    NotAnObject(&'static str),
    #[error("Invalid user attributes: {0}")]
    InvalidAttributes(String),
}

/// Identity attributes of the user who just confirmed their account.
///
/// A `null` attribute is treated the same as a missing one. Attributes other
/// than these three are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserAttributes {
    /// Stable unique identifier for the user
    #[serde(default)]
    pub sub: Option<String>,
    /// Email address the user registered with
    #[serde(default)]
    pub email: Option<String>,
    /// Optional display name
    #[serde(default)]
    pub preferred_username: Option<String>,
}

impl UserAttributes {
    /// Extract `request.userAttributes` from a post-confirmation event.
    pub fn from_event(event: &Value) -> Result<Self, AttributeError> {
        let request = event
            .get("request")
            .filter(|v| !v.is_null())
            .ok_or(AttributeError::MissingField("request"))?;
        if !request.is_object() {
            return Err(AttributeError::NotAnObject("request"));
        }

        let attrs = request
            .get("userAttributes")
            .filter(|v| !v.is_null())
            .ok_or(AttributeError::MissingField("userAttributes"))?;
        if !attrs.is_object() {
            return Err(AttributeError::NotAnObject("userAttributes"));
        }

        Self::deserialize(attrs).map_err(|e| AttributeError::InvalidAttributes(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_all_attributes() {
        let event = json!({
            "version": "1",
            "request": {
                "userAttributes": {
                    "sub": "11111111-2222-3333-4444-555555555555",
                    "email": "user@example.com",
                    "preferred_username": "displayHandle",
                    "email_verified": "true"
                }
            },
            "response": {}
        });

        let attrs = UserAttributes::from_event(&event).unwrap();
        assert_eq!(attrs.sub.as_deref(), Some("11111111-2222-3333-4444-555555555555"));
        assert_eq!(attrs.email.as_deref(), Some("user@example.com"));
        assert_eq!(attrs.preferred_username.as_deref(), Some("displayHandle"));
    }

    #[test]
    fn test_null_and_missing_attributes_are_none() {
        let event = json!({
            "request": { "userAttributes": { "sub": "abc", "email": null } }
        });

        let attrs = UserAttributes::from_event(&event).unwrap();
        assert_eq!(attrs.sub.as_deref(), Some("abc"));
        assert_eq!(attrs.email, None);
        assert_eq!(attrs.preferred_username, None);
    }

    #[test]
    fn test_missing_request_is_an_error() {
        let err = UserAttributes::from_event(&json!({ "version": "1" })).unwrap_err();
        assert_eq!(err, AttributeError::MissingField("request"));

        let err = UserAttributes::from_event(&json!({ "request": null })).unwrap_err();
        assert_eq!(err, AttributeError::MissingField("request"));
    }

    #[test]
    fn test_non_object_shapes_are_errors() {
        let err = UserAttributes::from_event(&json!({ "request": "nope" })).unwrap_err();
        assert_eq!(err, AttributeError::NotAnObject("request"));

        let err = UserAttributes::from_event(&json!({ "request": { "userAttributes": [1, 2] } }))
            .unwrap_err();
        assert_eq!(err, AttributeError::NotAnObject("userAttributes"));

        let err = UserAttributes::from_event(&json!("just a string")).unwrap_err();
        assert_eq!(err, AttributeError::MissingField("request"));
    }

    #[test]
    fn test_non_string_attribute_is_an_error() {
        let event = json!({
            "request": { "userAttributes": { "sub": 42, "email": "user@example.com" } }
        });

        let err = UserAttributes::from_event(&event).unwrap_err();
        assert!(matches!(err, AttributeError::InvalidAttributes(_)));
    }
}
