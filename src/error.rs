//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every request either succeeds or ends in exactly one of these variants; there is no
//! partial success and no retry logic.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return
//! `Result<_, AppError>` and have failures rendered as `{"error": "..."}` JSON bodies.
//! Server-side failures are logged with their details and reported to the client with a
//! generic message only.

use actix_web::{
    error::{BlockingError, ResponseError},
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Authentication failed or is required but missing (HTTP 401).
    ///
    /// Rendered with a `WWW-Authenticate: Bearer` challenge.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed request that could not be decoded (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// A unique resource already exists, e.g. a taken username (HTTP 400).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The resource is absent or not owned by the caller (HTTP 404).
    /// The two cases are deliberately indistinguishable.
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Error originating from the storage layer (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Input failed validation (HTTP 422 Unprocessable Entity).
    #[error("Validation Error: {0}")]
    ValidationError(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        let message = match self {
            AppError::Unauthorized(msg) => {
                builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
                msg.as_str()
            }
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
            AppError::InternalServerError(detail) | AppError::DatabaseError(detail) => {
                log::error!("{}", detail);
                "Internal server error"
            }
        };
        builder.json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let response = AppError::Unauthorized("Invalid token".into()).error_response();
        assert_eq!(response.status(), 401);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let response = AppError::BadRequest("Invalid input".into()).error_response();
        assert_eq!(response.status(), 400);

        let response = AppError::Conflict("Username already registered".into()).error_response();
        assert_eq!(response.status(), 400);

        let response = AppError::NotFound("Task not found".into()).error_response();
        assert_eq!(response.status(), 404);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());

        let response = AppError::ValidationError("title: length".into()).error_response();
        assert_eq!(response.status(), 422);

        let response = AppError::DatabaseError("connection reset".into()).error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn test_internal_details_are_not_exposed() {
        let response = AppError::DatabaseError("password authentication failed for user admin".into())
            .error_response();
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }
}
