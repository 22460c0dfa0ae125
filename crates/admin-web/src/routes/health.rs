//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use database::user_mirror;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
}

/// Report liveness and whether the store answers.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = match user_mirror::count_users(state.db.pool()).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            false
        }
    };

    Json(Health {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
