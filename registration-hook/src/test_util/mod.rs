use std::sync::{Arc, Mutex};

use registration_common::UserRecord;
use serde_json::{Map, Value};
use tracing::Level;

use crate::handler::{InvocationContext, RegisterUserHandler};
use crate::logging::HookLogger;
use crate::store::{StoreError, UserStore};
use crate::AppState;

pub fn create_test_state(store: Arc<dyn UserStore>) -> Arc<AppState> {
    Arc::new(AppState::new(RegisterUserHandler::new(store)))
}

/// Build a post-confirmation event, leaving out any attribute given as `None`.
pub fn post_confirmation_event(
    sub: Option<&str>,
    email: Option<&str>,
    preferred_username: Option<&str>,
) -> Value {
    let mut attrs = Map::new();
    if let Some(sub) = sub {
        attrs.insert("sub".to_string(), Value::String(sub.to_string()));
    }
    if let Some(email) = email {
        attrs.insert("email".to_string(), Value::String(email.to_string()));
    }
    if let Some(name) = preferred_username {
        attrs.insert("preferred_username".to_string(), Value::String(name.to_string()));
    }

    serde_json::json!({
        "version": "1",
        "triggerSource": "PostConfirmation_ConfirmSignUp",
        "request": { "userAttributes": attrs },
        "response": {}
    })
}

/// Log sink that keeps every message for later assertions.
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, level: Level) -> usize {
        self.entries().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|(_, message)| message.contains(needle))
    }
}

impl HookLogger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }
}

pub fn recording_context() -> (InvocationContext, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::default());
    (InvocationContext::new("test-invocation", logger.clone()), logger)
}

/// Store whose every call fails, for exercising the error path end to end.
pub struct FailingUserStore {
    pub message: String,
}

impl FailingUserStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl UserStore for FailingUserStore {
    fn put_if_absent(&self, _record: &UserRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.message.clone()))
    }

    fn get(&self, _user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Err(StoreError::Unavailable(self.message.clone()))
    }

    fn count(&self) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable(self.message.clone()))
    }
}
