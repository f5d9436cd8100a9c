pub mod config;
pub mod handler;
pub mod logging;
pub mod routes;
pub mod store;
pub mod test_util;

pub use config::{Config, StorageBackend, StorageConfig};
pub use handler::{
    InvocationContext, RegisterUserHandler, RegistrationError, RegistrationOutcome,
    RegistrationStatus,
};
pub use logging::{HookLogger, TracingLogger};
pub use store::{open_store, MemoryUserStore, SqliteUserStore, StoreError, UserStore};

use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    /// Built once at startup and shared by every invocation.
    pub handler: Arc<RegisterUserHandler>,
}

impl AppState {
    pub fn new(handler: RegisterUserHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}
