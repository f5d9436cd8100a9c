//! Post-confirmation registration handler.
//!
//! Records a newly confirmed user exactly once and hands the event back to
//! the identity provider untouched. Nothing that goes wrong in here is
//! allowed to reach the caller: every failure is classified, logged and
//! swallowed.

use std::sync::Arc;

use registration_common::{AttributeError, RecordError, UserAttributes, UserRecord};
use serde_json::Value;
use tracing::Level;

use crate::config::StorageConfig;
use crate::logging::{HookLogger, TracingLogger};
use crate::store::{open_store, StoreError, UserStore};

/// Per-invocation context handed to the handler.
pub struct InvocationContext {
    invocation_id: String,
    logger: Arc<dyn HookLogger>,
}

impl InvocationContext {
    pub fn new(invocation_id: impl Into<String>, logger: Arc<dyn HookLogger>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            logger,
        }
    }

    /// Context with a fresh invocation ID that logs through `tracing`.
    pub fn traced() -> Self {
        let invocation_id = uuid::Uuid::new_v4().to_string();
        let logger = Arc::new(TracingLogger::new(invocation_id.clone()));
        Self::new(invocation_id, logger)
    }

    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    pub fn logger(&self) -> &dyn HookLogger {
        self.logger.as_ref()
    }
}

/// Anything that can go wrong between reading the event and the store write.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Malformed event: {0}")]
    Attributes(#[from] AttributeError),
    #[error("Invalid user record: {0}")]
    Record(#[from] RecordError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub enum RegistrationStatus {
    /// A new user record was written.
    Registered,
    /// The user already had a record; nothing was written.
    AlreadyRegistered,
    /// `sub` or `email` was absent; no write was attempted.
    MissingAttributes,
    Failed(RegistrationError),
}

/// Result of one registration attempt, with whatever identity was known.
#[derive(Debug)]
pub struct RegistrationOutcome {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub status: RegistrationStatus,
}

impl RegistrationOutcome {
    /// Emit the outcome to the invocation's log sink.
    pub fn report(&self, logger: &dyn HookLogger) {
        let user_id = self.user_id.as_deref().unwrap_or("<unknown>");
        let email = self.email.as_deref().unwrap_or("<unknown>");

        match &self.status {
            RegistrationStatus::Registered => logger.log(
                Level::INFO,
                &format!("Registered user {} with email {}", user_id, email),
            ),
            RegistrationStatus::AlreadyRegistered => logger.log(
                Level::INFO,
                &format!("User {} with email {} already registered, skipping", user_id, email),
            ),
            RegistrationStatus::MissingAttributes => {
                let missing = match (self.user_id.is_none(), self.email.is_none()) {
                    (true, true) => "sub and email",
                    (true, false) => "sub",
                    _ => "email",
                };
                logger.log(
                    Level::INFO,
                    &format!(
                        "Post-confirmation event is missing {} (user {}, email {}), skipping registration",
                        missing, user_id, email
                    ),
                )
            }
            RegistrationStatus::Failed(e) => logger.log(
                Level::ERROR,
                &format!("Failed to register user {} with email {}: {}", user_id, email, e),
            ),
        }
    }
}

/// Writes a user record for each newly confirmed account.
pub struct RegisterUserHandler {
    store: Arc<dyn UserStore>,
}

impl RegisterUserHandler {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Open the configured store once and build a handler around it.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StoreError> {
        Ok(Self::new(open_store(config)?))
    }

    /// Register the user described by `event` and return `event` unchanged.
    pub fn handle_request(&self, event: Value, ctx: &InvocationContext) -> Value {
        self.register(&event).report(ctx.logger());
        event
    }

    /// Register the user described by `event` and classify what happened.
    pub fn register(&self, event: &Value) -> RegistrationOutcome {
        let mut user_id = None;
        let mut email = None;

        let status = match self.try_register(event, &mut user_id, &mut email) {
            Ok(status) => status,
            Err(RegistrationError::Store(StoreError::ConditionFailed { .. })) => {
                RegistrationStatus::AlreadyRegistered
            }
            Err(e) => RegistrationStatus::Failed(e),
        };

        RegistrationOutcome {
            user_id,
            email,
            status,
        }
    }

    fn try_register(
        &self,
        event: &Value,
        user_id: &mut Option<String>,
        email: &mut Option<String>,
    ) -> Result<RegistrationStatus, RegistrationError> {
        let attrs = UserAttributes::from_event(event)?;
        *user_id = attrs.sub.clone();
        *email = attrs.email.clone();

        let (Some(sub), Some(addr)) = (attrs.sub.as_deref(), attrs.email.as_deref()) else {
            return Ok(RegistrationStatus::MissingAttributes);
        };

        let record = UserRecord::registered_now(sub, addr, attrs.preferred_username.as_deref())?;
        self.store.put_if_absent(&record)?;

        Ok(RegistrationStatus::Registered)
    }
}
