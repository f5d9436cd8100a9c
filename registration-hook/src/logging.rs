//! Log sinks handed to the handler with each invocation.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Message-emitting collaborator available to the handler.
pub trait HookLogger: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards hook messages to `tracing`, tagged with the invocation ID.
pub struct TracingLogger {
    invocation_id: String,
}

impl TracingLogger {
    pub fn new(invocation_id: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
        }
    }
}

impl HookLogger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        let id = &self.invocation_id;
        if level == Level::ERROR {
            tracing::error!(invocation_id = %id, "{}", message);
        } else if level == Level::WARN {
            tracing::warn!(invocation_id = %id, "{}", message);
        } else if level == Level::INFO {
            tracing::info!(invocation_id = %id, "{}", message);
        } else {
            tracing::debug!(invocation_id = %id, "{}", message);
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
