//! Health / heartbeat endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;
use utoipa::OpenApi;

use crate::entities::TodoStore;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health))]
pub struct HealthApi;

/// Register health-check routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Heartbeat endpoint; also pings the store with a count query.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server and store are reachable", body = Value),
        (status = 503, description = "Store is unreachable", body = Value)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.store.count_todos().await {
        Ok(todos) => (
            StatusCode::OK,
            Json(json!({
                "status":  "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "todos":   todos,
            })),
        ),
        Err(e) => {
            warn!(error = %e, "health check could not reach the store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status":  "unavailable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
