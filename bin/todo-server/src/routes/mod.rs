//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (per-request trace-ID injection, CORS)
//! - Health / heartbeat route
//! - `/api/todos` CRUD routes
//! - Optional OpenAPI document (disable with `TODO_ENABLE_DOCS=false`)

mod api;
pub mod doc;
mod health;

use crate::middleware::{cors, trace};
use crate::state::AppState;
use axum::{Router, middleware};
use std::sync::Arc;
use tower::ServiceBuilder;

// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", api::router());

    if state.config.enable_docs {
        app = app.merge(doc::router());
    }

    app
        // Outermost layers execute first on the way in.
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(trace::trace_middleware))
                .layer(cors::cors_layer(&state.config)),
        )
        .with_state(state)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::entities::SqliteStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn app_with(config: Config) -> Router {
        build(Arc::new(AppState {
            config: Arc::new(config),
            store: Arc::new(SqliteStore::in_memory().await),
        }))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn docs_route_follows_config() {
        let app = app_with(Config::default()).await;
        let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let app = app_with(Config { enable_docs: false, ..Config::default() }).await;
        let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn trace_id_is_echoed() {
        let app = app_with(Config::default()).await;
        let trace_id = uuid::Uuid::new_v4().to_string();
        let request = Request::builder()
            .uri("/health")
            .header(trace::X_TRACE_ID, &trace_id)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[trace::X_TRACE_ID], trace_id.as_str());
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let app = app_with(Config::default()).await;
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn cors_allow_list_only_admits_listed_origins() {
        let config = Config {
            cors_allowed_origins: Some("http://localhost:3000, ,".to_owned()),
            ..Config::default()
        };
        let app = app_with(config).await;

        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["access-control-allow-origin"], "http://localhost:3000");

        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn oversized_request_body_is_rejected() {
        let app = app_with(Config::default()).await;
        let body = format!(r#"{{"title":"t","description":"{}"}}"#, "x".repeat(trace::MAX_REQUEST_BODY));
        let request = Request::builder()
            .method("POST")
            .uri("/api/todos")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.headers().contains_key(trace::X_TRACE_ID));
    }
}
