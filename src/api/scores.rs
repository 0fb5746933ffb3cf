//! `/scores/` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{ApiError, AppState, Resource, deleted};
use crate::model::{Id, Score};

#[derive(Deserialize)]
struct CreateParams {
    student_id: Id,
    subject_id: Id,
    score: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scores", get(list_scores).post(create_score))
        .route("/scores/", get(list_scores).post(create_score))
        .route("/scores/{id}", get(get_score).delete(delete_score))
}

async fn create_score(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
) -> Result<Json<Score>, ApiError> {
    let score = state
        .db
        .create_score(params.student_id, params.subject_id, params.score)
        .await?;
    info!(
        id = score.id,
        student_id = score.student_id,
        subject_id = score.subject_id,
        "Score created"
    );
    Ok(Json(score))
}

async fn list_scores(State(state): State<AppState>) -> Result<Json<Vec<Score>>, ApiError> {
    Ok(Json(state.db.list_scores().await?))
}

async fn get_score(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<Json<Score>, ApiError> {
    state
        .db
        .get_score(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(Resource::Score))
}

async fn delete_score(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<Json<Value>, ApiError> {
    if state.db.delete_score(id).await? {
        info!(id, "Score deleted");
        Ok(deleted(Resource::Score))
    } else {
        Err(ApiError::NotFound(Resource::Score))
    }
}
