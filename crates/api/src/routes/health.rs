use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy` when the store answers, `degraded` otherwise.
    pub status: &'static str,
    /// Current UTC time, RFC 3339.
    pub timestamp: String,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the store answered a ping.
    pub db_healthy: bool,
}

/// GET /health -- returns service and store health. Always 200.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match catalog_db::health_check(state.store.as_ref()).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };

    let status = if db_healthy { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status,
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
