//! Application error type shared by every HTTP handler.
//!
//! An [`AppError`] pairs an [`ErrorKind`] (which decides the HTTP status and
//! the machine-readable `code` in the response body) with an
//! [`anyhow::Error`] carrying the human-readable message.
//!
//! ```text
//! { "error": "Book not available", "code": "UNAVAILABLE" }
//! ```

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Unavailable,
    ValidationError,
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub error: Error,
}

/// Error body as rendered to clients. Used for OpenAPI documentation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorKind,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            kind,
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, StatusCode::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Conflict, StatusCode::CONFLICT, err)
    }

    pub fn unavailable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::Unavailable, StatusCode::CONFLICT, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::ValidationError, StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            ErrorKind::ValidationError,
            StatusCode::UNPROCESSABLE_ENTITY,
            err,
        )
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.error, self.kind.code())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.kind.code(), error = %format!("{:#}", self.error), "Request failed");
        }

        let body = Json(json!({
            "error": self.error.to_string(),
            "code": self.kind.code(),
        }));

        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::unprocessable(anyhow::anyhow!("{}", errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_pick_status_and_kind() {
        let cases = [
            (AppError::not_found(anyhow::anyhow!("x")), StatusCode::NOT_FOUND, ErrorKind::NotFound),
            (AppError::conflict(anyhow::anyhow!("x")), StatusCode::CONFLICT, ErrorKind::Conflict),
            (
                AppError::unavailable(anyhow::anyhow!("x")),
                StatusCode::CONFLICT,
                ErrorKind::Unavailable,
            ),
            (
                AppError::bad_request(anyhow::anyhow!("x")),
                StatusCode::BAD_REQUEST,
                ErrorKind::ValidationError,
            ),
            (
                AppError::internal(anyhow::anyhow!("x")),
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Internal,
            ),
        ];

        for (err, status, kind) in cases {
            assert_eq!(err.status, status);
            assert!(err.is(kind));
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::NotFound.code(), "NOT_FOUND");
        assert_eq!(ErrorKind::ValidationError.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_into_response_uses_status() {
        let response = AppError::conflict(anyhow::anyhow!("Book already returned")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_anyhow_converts_to_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "boom (INTERNAL)");
    }
}
