//! API error type and its HTTP mapping.
//!
//! Only "not found" is a client error. Anything the store rejects becomes a
//! bare 500 with no structured body; the cause goes to the log.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::DatabaseError;

/// Kind of record a route operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Student,
    Subject,
    Score,
}

impl Resource {
    pub fn label(self) -> &'static str {
        match self {
            Resource::Student => "Student",
            Resource::Subject => "Subject",
            Resource::Score => "Score",
        }
    }
}

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// No record with the requested id (404).
    NotFound(Resource),

    /// Store failure, including constraint violations (500, logged).
    Database(DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": format!("{} not found", resource.label()) })),
            )
                .into_response(),
            Self::Database(e) => {
                tracing::error!(error = %e, "Request failed in store");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        Self::Database(e)
    }
}
