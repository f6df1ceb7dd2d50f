//! Field validators for account input.
//!
//! Each validator returns the failure for one field instead of erroring, so
//! callers can collect every problem into a [`FieldErrors`] before replying.

use validator::ValidateEmail;

use dashcam_auth::PasswordValidator;
use dashcam_core::error::{ErrorCode, FieldError};

/// Fields a client may change through a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Email,
    FullName,
    Password,
}

const PATCHABLE: &[(&str, AccountField)] = &[
    ("email", AccountField::Email),
    ("fullName", AccountField::FullName),
    ("password", AccountField::Password),
];

impl AccountField {
    /// Resolve a client-supplied field name. Unknown names are rejected.
    pub fn from_name(name: &str) -> Option<Self> {
        PATCHABLE
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, field)| *field)
    }

    /// Run the validator bound to this field.
    pub fn validate(self, value: &str, policy: &PasswordValidator) -> Option<FieldError> {
        match self {
            Self::Email => email(Some(value)),
            Self::FullName => full_name(Some(value)),
            Self::Password => password(Some(value), policy),
        }
    }
}

pub fn email(value: Option<&str>) -> Option<FieldError> {
    match value.map(str::trim) {
        None | Some("") => Some(FieldError::new(ErrorCode::MissingEmail, "email")),
        Some(text) if !text.validate_email() => {
            Some(FieldError::new(ErrorCode::InvalidEmail, "email"))
        }
        Some(_) => None,
    }
}

pub fn full_name(value: Option<&str>) -> Option<FieldError> {
    match value {
        None => Some(FieldError::new(ErrorCode::MissingFullName, "fullName")),
        Some(text) if text.trim().is_empty() => {
            Some(FieldError::new(ErrorCode::BlankFullName, "fullName"))
        }
        Some(_) => None,
    }
}

/// Reports every unmet complexity rule in a single message.
pub fn password(value: Option<&str>, policy: &PasswordValidator) -> Option<FieldError> {
    let Some(text) = value.filter(|t| !t.is_empty()) else {
        return Some(FieldError::new(ErrorCode::MissingPassword, "password"));
    };

    let unmet = policy.unmet_rules(text);
    if unmet.is_empty() {
        None
    } else {
        Some(FieldError::with_message(
            ErrorCode::WeakPassword,
            "password",
            format!("Password must contain {}", unmet.join(", ")),
        ))
    }
}
