//! HTTP surface — one axum handler per route, each running a single store
//! operation.

pub mod error;
pub mod scores;
pub mod students;
pub mod subjects;

use std::sync::Arc;

use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, Resource};

use crate::store::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
}

/// Build the full router for students, subjects, and scores.
pub fn router(db: Arc<dyn Database>) -> Router {
    Router::new()
        .merge(students::router())
        .merge(subjects::router())
        .merge(scores::router())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { db })
}

/// Body returned by a successful delete.
fn deleted(resource: Resource) -> Json<Value> {
    Json(json!({ "message": format!("{} deleted", resource.label()) }))
}
