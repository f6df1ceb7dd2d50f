//! Token endpoint request validation.

use serde::Deserialize;

use dashcam_core::error::{ErrorCode, FieldErrors};

/// Raw token endpoint parameters, as posted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrantRequest {
    pub grant_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub refresh_token: Option<String>,
}

/// A well-formed grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    Password { username: String, password: String },
    RefreshToken { refresh_token: String },
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl GrantRequest {
    /// Check that the parameters required by `grant_type` are present,
    /// reporting every missing one.
    pub fn validate(self) -> Result<Grant, FieldErrors> {
        let mut errors = FieldErrors::new();

        let Some(grant_type) = present(self.grant_type) else {
            errors.add(ErrorCode::MissingGrantType, "grant_type");
            return Err(errors);
        };

        match grant_type.as_str() {
            "password" => {
                let username = present(self.username);
                let password = present(self.password);
                if username.is_none() {
                    errors.add(ErrorCode::MissingUsername, "username");
                }
                if password.is_none() {
                    errors.add(ErrorCode::MissingGrantPassword, "password");
                }
                match (username, password) {
                    (Some(username), Some(password)) => Ok(Grant::Password { username, password }),
                    _ => Err(errors),
                }
            }
            "refresh_token" => match present(self.refresh_token) {
                Some(refresh_token) => Ok(Grant::RefreshToken { refresh_token }),
                None => {
                    errors.add(ErrorCode::MissingRefreshToken, "refresh_token");
                    Err(errors)
                }
            },
            _ => {
                errors.add(ErrorCode::UnsupportedGrantType, "grant_type");
                Err(errors)
            }
        }
    }
}
