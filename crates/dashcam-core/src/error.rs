//! Unified application error types for the dashcam backend.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. Every error carries a stable
//! [`ErrorCode`] that clients can match on, and validation failures carry
//! the full list of offending fields rather than only the first one.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The requested resource was not found, or belongs to someone else.
    NotFound,
    /// Missing, invalid, expired or revoked credentials.
    Unauthorized,
    /// Input validation failed.
    Validation,
    /// A store-level uniqueness constraint was violated.
    Constraint,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Constraint => write!(f, "CONSTRAINT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// Stable numeric codes exposed to API clients.
///
/// Codes below are either *envelope* codes (top-level `code` of an error
/// response, with a description) or *field* codes (entries of the `errors`
/// list). Numbers are part of the public contract and must never be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoAuthorizationProvided,
    MalformedAuthorization,
    Unauthorized,
    InvalidRefreshToken,
    InvalidAccessToken,
    MissingGrantType,
    UnsupportedGrantType,
    MissingUsername,
    UnknownUsername,
    MissingGrantPassword,
    IncorrectPassword,
    MissingRefreshToken,
    RefreshTokenRejected,
    EmailInUse,
    MissingEmail,
    InvalidEmail,
    MissingFullName,
    BlankFullName,
    MissingPassword,
    WeakPassword,
    NotAString,
    ValidationFailed,
    ConstraintViolation,
    MalformedBody,
    MalformedQuery,
    AccountNotFound,
    UnsupportedField,
    InvalidVideoId,
    MissingOffset,
    InvalidOffset,
    VideoAlreadyRegistered,
    VideoNotFound,
    VideoContentNotAvailable,
    InvalidVideoMetadata,
    NothingToFinalize,
    InternalError,
}

impl ErrorCode {
    /// Numeric value sent on the wire.
    pub fn code(self) -> u16 {
        match self {
            Self::NoAuthorizationProvided => 1000,
            Self::MalformedAuthorization => 1001,
            Self::Unauthorized => 1002,
            Self::InvalidRefreshToken => 1003,
            Self::InvalidAccessToken => 1004,
            Self::MissingGrantType => 1005,
            Self::UnsupportedGrantType => 1006,
            Self::MissingUsername => 1007,
            Self::UnknownUsername => 1008,
            Self::MissingGrantPassword => 1009,
            Self::IncorrectPassword => 1010,
            Self::MissingRefreshToken => 1011,
            Self::RefreshTokenRejected => 1012,
            Self::EmailInUse => 1013,
            Self::MissingEmail => 1014,
            Self::InvalidEmail => 1015,
            Self::MissingFullName => 1016,
            Self::BlankFullName => 1017,
            Self::MissingPassword => 1018,
            Self::WeakPassword => 1019,
            Self::NotAString => 1020,
            Self::ValidationFailed => 1024,
            Self::ConstraintViolation => 1025,
            Self::MalformedBody => 1026,
            Self::MalformedQuery => 1027,
            Self::AccountNotFound => 1030,
            Self::UnsupportedField => 1035,
            Self::InvalidVideoId => 1050,
            Self::MissingOffset => 1051,
            Self::InvalidOffset => 1052,
            Self::VideoAlreadyRegistered => 1053,
            Self::VideoNotFound => 1054,
            Self::VideoContentNotAvailable => 1055,
            Self::InvalidVideoMetadata => 1056,
            Self::NothingToFinalize => 1057,
            Self::InternalError => 1099,
        }
    }

    /// Short human-readable message.
    pub fn message(self) -> &'static str {
        match self {
            Self::NoAuthorizationProvided => "No Authorization Provided",
            Self::MalformedAuthorization => "Malformed Authorization",
            Self::Unauthorized => "Unauthorized",
            Self::InvalidRefreshToken => "Invalid Refresh Token",
            Self::InvalidAccessToken => "Invalid Access Token",
            Self::MissingGrantType => "Must provide grant type",
            Self::UnsupportedGrantType => "grant_type must be \"password\" or \"refresh_token\"",
            Self::MissingUsername => "Must provide username",
            Self::UnknownUsername => "The provided username does not exist",
            Self::MissingGrantPassword => "Must provide password",
            Self::IncorrectPassword => "The provided password is incorrect",
            Self::MissingRefreshToken => "Must provide refresh_token",
            Self::RefreshTokenRejected => {
                "The provided refresh token is invalid, expired, or revoked"
            }
            Self::EmailInUse => "Email address is already in use",
            Self::MissingEmail => "Must provide email",
            Self::InvalidEmail => "Not a valid email address",
            Self::MissingFullName => "Must provide full name",
            Self::BlankFullName => "Full name must not be blank",
            Self::MissingPassword => "Must provide password",
            Self::WeakPassword => "Password is too weak",
            Self::NotAString => "Field must be a string",
            Self::ValidationFailed => "Validation Failed",
            Self::ConstraintViolation => "Input Constraint Violation",
            Self::MalformedBody => "Malformed Request Body",
            Self::MalformedQuery => "Malformed Query String",
            Self::AccountNotFound => "Account Not Found",
            Self::UnsupportedField => "Unsupported Field",
            Self::InvalidVideoId => "Video id must be 64 hexadecimal characters",
            Self::MissingOffset => "Must provide offset",
            Self::InvalidOffset => "Offset must be an integer greater than or equal to -1",
            Self::VideoAlreadyRegistered => "Video id already registered",
            Self::VideoNotFound => "Video Not Found",
            Self::VideoContentNotAvailable => "Video Content Not Available",
            Self::InvalidVideoMetadata => "Invalid video metadata",
            Self::NothingToFinalize => "No uploaded chunks to finalize",
            Self::InternalError => "Internal Server Error",
        }
    }

    /// Long description for envelope codes. Field codes return an empty string.
    pub fn description(self) -> &'static str {
        match self {
            Self::NoAuthorizationProvided => {
                "HTTP Authorization header required (e.g. Authorization: Bearer <token>)"
            }
            Self::MalformedAuthorization => {
                "Authorization header is malformed. Proper format: \"Authorization: Bearer <token>\""
            }
            Self::Unauthorized => "The provided access token is invalid, expired, or revoked",
            Self::InvalidRefreshToken => "The provided refresh token is invalid",
            Self::InvalidAccessToken => "The provided access token is invalid",
            Self::ValidationFailed => "The provided input does not meet the required JSON schema",
            Self::ConstraintViolation => "The provided input violates data constraints",
            Self::MalformedBody => "The request body could not be parsed",
            Self::MalformedQuery => "The query string could not be parsed",
            Self::AccountNotFound => {
                "The provided account id is either invalid or you lack sufficient authorization"
            }
            Self::VideoNotFound => {
                "The provided video id is either invalid or you lack sufficient authorization"
            }
            Self::VideoContentNotAvailable => {
                "The video exists but its content has not been uploaded yet"
            }
            Self::InternalError => "An unexpected error occurred while processing the request",
            _ => "",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

/// One offending input field inside an aggregated error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Numeric field code.
    pub code: u16,
    /// Name of the offending field, as the client spelled it.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl FieldError {
    /// Build a field error using the code's standard message.
    pub fn new(code: ErrorCode, field: impl Into<String>) -> Self {
        Self::with_message(code, field, code.message())
    }

    /// Build a field error with a custom message.
    pub fn with_message(
        code: ErrorCode,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.code(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulator for validation failures.
///
/// Validators push into this instead of returning early, so a single
/// response reports every invalid field.
#[derive(Debug, Default, Clone)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure with the code's standard message.
    pub fn add(&mut self, code: ErrorCode, field: impl Into<String>) {
        self.0.push(FieldError::new(code, field));
    }

    /// Record a prepared field error.
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Merge another accumulator into this one.
    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Borrow the recorded failures.
    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when empty, otherwise a `ValidationFailed` error.
    pub fn into_result(self) -> Result<(), AppError> {
        self.into_result_as(ErrorCode::ValidationFailed)
    }

    /// `Ok(())` when empty, otherwise a validation error with the given
    /// envelope code.
    pub fn into_result_as(self, code: ErrorCode) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.into_error_as(code))
        }
    }

    /// Convert into a `ValidationFailed` error unconditionally.
    pub fn into_error(self) -> AppError {
        self.into_error_as(ErrorCode::ValidationFailed)
    }

    /// Convert into a validation error with the given envelope code.
    pub fn into_error_as(self, code: ErrorCode) -> AppError {
        AppError::from_code(ErrorKind::Validation, code).with_errors(self.0)
    }
}

/// The unified application error used throughout the backend.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// Stable client-facing code.
    pub code: ErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// Longer explanation shown to clients.
    pub description: String,
    /// Aggregated per-field failures, if any.
    pub errors: Vec<FieldError>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create an error from a kind and a code, using the code's text.
    pub fn from_code(kind: ErrorKind, code: ErrorCode) -> Self {
        Self {
            kind,
            code,
            message: code.message().to_string(),
            description: code.description().to_string(),
            errors: Vec::new(),
            source: None,
        }
    }

    /// Create an error with a free-form message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let code = match kind {
            ErrorKind::NotFound => ErrorCode::VideoNotFound,
            ErrorKind::Unauthorized => ErrorCode::Unauthorized,
            ErrorKind::Validation => ErrorCode::ValidationFailed,
            ErrorKind::Constraint => ErrorCode::ConstraintViolation,
            ErrorKind::Internal | ErrorKind::Database | ErrorKind::Configuration => {
                ErrorCode::InternalError
            }
        };
        Self {
            kind,
            code,
            message: message.into(),
            description: code.description().to_string(),
            errors: Vec::new(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        let mut err = Self::new(kind, message);
        err.source = Some(Box::new(source));
        err
    }

    /// Attach aggregated field errors.
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// Create a not-found error for the given envelope code.
    pub fn not_found(code: ErrorCode) -> Self {
        Self::from_code(ErrorKind::NotFound, code)
    }

    /// Create an authentication failure for the given envelope code.
    pub fn unauthorized(code: ErrorCode) -> Self {
        Self::from_code(ErrorKind::Unauthorized, code)
    }

    /// Create a `ValidationFailed` error carrying a single field failure.
    pub fn invalid_field(code: ErrorCode, field: impl Into<String>) -> Self {
        Self::from_code(ErrorKind::Validation, ErrorCode::ValidationFailed)
            .with_errors(vec![FieldError::new(code, field)])
    }

    /// Create a constraint violation for a single conflicting field.
    pub fn constraint(code: ErrorCode, field: impl Into<String>) -> Self {
        Self::from_code(ErrorKind::Constraint, ErrorCode::ConstraintViolation)
            .with_errors(vec![FieldError::new(code, field)])
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether this error should be hidden from clients and logged instead.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Internal | ErrorKind::Database | ErrorKind::Configuration
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            code: self.code,
            message: self.message.clone(),
            description: self.description.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
