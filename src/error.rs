use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::db::ownership::Entity;
use crate::validation::{FieldError, ValidationErrors};

#[derive(Debug, ThisError)]
pub enum BudgetError {
    #[error("Invalid authentication token: {0}")]
    Unauthorized(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0} not found")]
    NotFound(Entity),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),
}

impl From<ValidationErrors> for BudgetError {
    fn from(errors: ValidationErrors) -> Self {
        BudgetError::Validation(errors)
    }
}

/// True when the store rejected a write because of a UNIQUE constraint.
pub fn is_unique_violation(err: &SqlxError) -> bool {
    matches!(err, SqlxError::Database(db) if db.is_unique_violation())
}

impl IntoResponse for BudgetError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            BudgetError::Unauthorized(reason) => {
                let body = ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: format!("Invalid authentication token: {reason}"),
                    fields: None,
                };
                let mut resp =
                    (StatusCode::UNAUTHORIZED, Json(ApiErrorResponse { error: body }))
                        .into_response();
                resp.headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                return resp;
            }
            BudgetError::Validation(errors) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                let body = ApiErrorBody {
                    code: "VALIDATION_FAILED".to_string(),
                    message: errors.to_string(),
                    fields: Some(errors.into_inner()),
                };
                (status, body)
            }
            BudgetError::NotFound(entity) => {
                let status = StatusCode::NOT_FOUND;
                let body = ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{entity} not found"),
                    fields: None,
                };
                (status, body)
            }
            BudgetError::Conflict(message) => {
                let status = StatusCode::CONFLICT;
                let body = ApiErrorBody {
                    code: "CONFLICT".to_string(),
                    message,
                    fields: None,
                };
                (status, body)
            }
            BudgetError::DatabaseError(e) => {
                error!(error = %e, "storage failure");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    fields: None,
                };
                (status, body)
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
