//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use dashcam_core::error::{AppError, ErrorCode, ErrorKind, FieldError};

/// Uniform API error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Stable numeric code.
    pub code: u16,
    /// Short human-readable message.
    pub message: String,
    /// Longer explanation.
    pub description: String,
    /// Per-field failures, when the error aggregates several.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorBody>,
}

/// One entry of [`ErrorEnvelope::errors`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorBody {
    pub code: u16,
    pub field: String,
    pub message: String,
}

impl From<FieldError> for FieldErrorBody {
    fn from(e: FieldError) -> Self {
        Self {
            code: e.code,
            field: e.field,
            message: e.message,
        }
    }
}

/// Handler error: an [`AppError`] rendered as an [`ErrorEnvelope`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// A request body that could not be parsed at all.
    pub fn malformed_body(detail: impl Into<String>) -> Self {
        let mut err = AppError::from_code(ErrorKind::Validation, ErrorCode::MalformedBody);
        err.description = detail.into();
        Self(err)
    }

    /// A query string that does not fit the handler's parameters.
    pub fn malformed_query(detail: impl Into<String>) -> Self {
        let mut err = AppError::from_code(ErrorKind::Validation, ErrorCode::MalformedQuery);
        err.description = detail.into();
        Self(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;

        let status = match err.kind {
            ErrorKind::Validation | ErrorKind::Constraint => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal | ErrorKind::Database | ErrorKind::Configuration => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = if err.is_server_error() {
            tracing::error!(
                kind = %err.kind,
                error = %err.message,
                source = ?err.source,
                "Internal server error"
            );
            let code = ErrorCode::InternalError;
            ErrorEnvelope {
                code: code.code(),
                message: code.message().to_string(),
                description: code.description().to_string(),
                errors: Vec::new(),
            }
        } else {
            ErrorEnvelope {
                code: err.code.code(),
                message: err.message,
                description: err.description,
                errors: err.errors.into_iter().map(FieldErrorBody::from).collect(),
            }
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_carries_bearer_challenge() {
        let response =
            ApiError(AppError::unauthorized(ErrorCode::NoAuthorizationProvided)).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn test_status_follows_kind() {
        let cases = [
            (AppError::not_found(ErrorCode::VideoNotFound), StatusCode::NOT_FOUND),
            (
                AppError::constraint(ErrorCode::EmailInUse, "email"),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::invalid_field(ErrorCode::MissingOffset, "offset"),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::new(ErrorKind::Database, "connection reset"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_malformed_body_uses_its_code() {
        let err = ApiError::malformed_body("EOF while parsing");
        assert_eq!(err.0.code, ErrorCode::MalformedBody);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
