//! `/subjects/` routes. Subjects have no single fetch and no update.

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{ApiError, AppState, Resource, deleted};
use crate::model::{Id, Subject};

#[derive(Deserialize)]
struct CreateParams {
    name: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/subjects/", get(list_subjects).post(create_subject))
        .route("/subjects/{id}", delete(delete_subject))
}

/// POST /subjects/
///
/// A name that already exists fails in the store and comes back as a 500.
async fn create_subject(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
) -> Result<Json<Subject>, ApiError> {
    let subject = state.db.create_subject(&params.name).await?;
    info!(id = subject.id, "Subject created");
    Ok(Json(subject))
}

async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, ApiError> {
    Ok(Json(state.db.list_subjects().await?))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<Json<Value>, ApiError> {
    if state.db.delete_subject(id).await? {
        info!(id, "Subject deleted");
        Ok(deleted(Resource::Subject))
    } else {
        Err(ApiError::NotFound(Resource::Subject))
    }
}
