//! Password complexity policy.

use dashcam_core::config::auth::AuthConfig;

/// Checks new passwords against the complexity policy: a minimum length and
/// at least one uppercase letter, lowercase letter, digit and symbol.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Every rule the password fails, in a fixed order. Empty means the
    /// password is acceptable.
    pub fn unmet_rules(&self, password: &str) -> Vec<String> {
        let mut unmet = Vec::new();

        if password.chars().count() < self.min_length {
            unmet.push(format!("at least {} characters", self.min_length));
        }
        if !password.chars().any(char::is_uppercase) {
            unmet.push("an uppercase letter".to_string());
        }
        if !password.chars().any(char::is_lowercase) {
            unmet.push("a lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            unmet.push("a digit".to_string());
        }
        // Underscore counts as a word character, not a symbol.
        if !password
            .chars()
            .any(|c| !c.is_alphanumeric() && c != '_' && !c.is_whitespace())
        {
            unmet.push("a symbol".to_string());
        }

        unmet
    }
}
