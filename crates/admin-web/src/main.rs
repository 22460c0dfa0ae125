//! Admin web interface for the storyteller platform.
//!
//! Serves a JSON API for administrators: sign-in, global AI and story
//! preferences, per-category prompts, and the call history.

mod auth;
mod config;
mod error;
mod history;
mod routes;
mod session;
mod state;
mod views;

use std::sync::Arc;

use agent_provider::{ProviderClient, ProviderConfig};
use database::Database;
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting admin web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Agent provider client
    let provider = ProviderClient::new(ProviderConfig::with_base_url(
        &config.agent_api_url,
        &config.agent_api_key,
    ))?;

    // Build application state
    let state = AppState::new(db, Arc::new(provider))
        .with_sessions(SessionStore::with_ttl(config.session_ttl));

    // Build router
    let app = routes::router()
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Admin web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
