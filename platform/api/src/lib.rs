use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use platform_db::{DbError, ValidationErrors};
use serde::Serialize;
use thiserror::Error;

/// Shared handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Body of a lookup that matched nothing.
pub const NOT_FOUND: &str = "Not found";
/// Body of a mutation whose target does not exist.
pub const NOT_FOUND_FOR_WRITE: &str = "Not found...";

const INTERNAL_MESSAGE: &str = "internal server error";
const VALIDATION_MESSAGE: &str = "validation failed";

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Validation(ValidationErrors),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound(NOT_FOUND)
    }

    pub fn not_found_for_write() -> Self {
        Self::NotFound(NOT_FOUND_FOR_WRITE)
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Validation(errors) => Self::Validation(errors),
            other => Self::internal(other.into()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// `{"message": ...}`, the shape of every acknowledgement and error body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new("OK")
    }
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    message: &'static str,
    errors: &'a ValidationErrors,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::NotFound(message) => (status, Json(Message::new(message))).into_response(),
            ApiError::Validation(errors) => {
                tracing::debug!(%errors, "rejected input");
                let body = ValidationBody {
                    message: VALIDATION_MESSAGE,
                    errors: &errors,
                };
                (status, Json(body)).into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                (status, Json(Message::new(INTERNAL_MESSAGE))).into_response()
            }
        }
    }
}

/// `"OK updated dataBase:<records>"`.
pub fn updated_ack<T: Serialize>(records: &[T]) -> ApiResult<Message> {
    let snapshot = serde_json::to_string(records).map_err(|err| ApiError::internal(err.into()))?;
    Ok(Message::new(format!("OK updated dataBase:{snapshot}")))
}

/// `"OK deleted element<record>updated dataBase:<records>"`.
pub fn deleted_ack<T: Serialize>(deleted: &T, remaining: &[T]) -> ApiResult<Message> {
    let deleted = serde_json::to_string(deleted).map_err(|err| ApiError::internal(err.into()))?;
    let snapshot =
        serde_json::to_string(remaining).map_err(|err| ApiError::internal(err.into()))?;
    Ok(Message::new(format!(
        "OK deleted element{deleted}updated dataBase:{snapshot}"
    )))
}
