use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

pub mod recipes;
pub mod recommendations;
pub mod state;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            // Request ID first so the trace span can read it
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/recommend", post(recommendations::recommend))
        .route("/recipes", get(recipes::list))
        .route("/recipes/:id", get(recipes::get_by_id))
}

/// Service index
async fn index() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/health",
            "recommend": "POST /api/recommend",
            "recipes": "GET /api/recipes",
            "recipe": "GET /api/recipes/:id"
        }
    }))
}

/// Health check endpoint
///
/// Always answers 200 so the process stays up while Postgres or the model
/// registry are unreachable; the body says which dependency is missing.
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let database = state.catalog.ping().await;
    let status = if database { "healthy" } else { "degraded" };
    tracing::debug!(store = state.catalog.name(), database, status, "Health check");

    (
        StatusCode::OK,
        Json(json!({
            "status": status,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "database": if database { "connected" } else { "disconnected" },
            "model": if state.model.is_loaded() { "loaded" } else { "not_loaded" },
        })),
    )
}
