use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::db::enums::InvalidStatus;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Node {0} does not exist")]
    UnknownNode(Uuid),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl AppError {
    /// A persisted row whose status is not one of the declared tags. This is a
    /// store fault, not a client one.
    pub fn corrupt_row(err: InvalidStatus) -> Self {
        AppError::DatabaseError(format!("corrupt row: {err}"))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnknownNode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
