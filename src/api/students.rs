//! `/students/` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{ApiError, AppState, Resource, deleted};
use crate::model::{Id, Student, StudentPatch};

#[derive(Deserialize)]
struct CreateParams {
    name: String,
    surname: String,
}

#[derive(Deserialize)]
struct UpdateParams {
    name: Option<String>,
    surname: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}

async fn create_student(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
) -> Result<Json<Student>, ApiError> {
    let student = state
        .db
        .create_student(&params.name, &params.surname)
        .await?;
    info!(id = student.id, "Student created");
    Ok(Json(student))
}

async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.db.list_students().await?))
}

async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<Json<Student>, ApiError> {
    state
        .db
        .get_student(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(Resource::Student))
}

/// PUT /students/{id}
///
/// Overwrites only the fields given. An empty value counts as not given.
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Query(params): Query<UpdateParams>,
) -> Result<Json<Student>, ApiError> {
    let patch = StudentPatch::from_params(params.name, params.surname);
    state
        .db
        .update_student(id, &patch)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(Resource::Student))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<Json<Value>, ApiError> {
    if state.db.delete_student(id).await? {
        info!(id, "Student deleted");
        Ok(deleted(Resource::Student))
    } else {
        Err(ApiError::NotFound(Resource::Student))
    }
}
