mod courses;
mod grades;
mod reports;
mod students;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(students::router())
        .merge(courses::router())
        .merge(grades::router())
        .nest("/reports", reports::router())
        .layer(TraceLayer::new_for_http())
        // the bundled frontend is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Treats an empty query-string value (`?student_id=`) the same as an
/// absent one.
fn non_empty(param: Option<&str>) -> Option<&str> {
    param.filter(|value| !value.is_empty())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Student Manager API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "student-manager",
    }))
}
