//! Registration hook - records newly confirmed users for the identity provider.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;

use registration_hook::{logging, routes, AppState, Config, RegisterUserHandler};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    if env::args().any(|a| a == "--version" || a == "-V") {
        println!("registration-hook {}", VERSION);
        return Ok(());
    }

    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Check config.toml or the HOOK__SECTION__KEY environment variables.",
            e
        )
    })?;

    logging::init(&config.logging.level);
    tracing::info!("Starting registration hook {}", VERSION);

    // One store connection for the life of the process.
    let handler = RegisterUserHandler::from_config(&config.storage)?;
    let state = Arc::new(AppState::new(handler));

    let app = routes::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
