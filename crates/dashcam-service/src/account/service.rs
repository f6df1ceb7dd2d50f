//! Account service: registration, profile lookup and partial updates.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use dashcam_auth::{PasswordHasher, PasswordValidator};
use dashcam_core::error::{AppError, ErrorCode, FieldError, FieldErrors};
use dashcam_core::result::AppResult;
use dashcam_core::types::AccountId;
use dashcam_database::AccountStore;
use dashcam_entity::account::{Account, AccountChanges, NewAccount};

use super::validation::{self, AccountField};
use crate::context::RequestContext;

/// Registration payload. Values stay untyped so a wrong JSON type is
/// reported per field rather than rejecting the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub email: Option<Value>,
    pub full_name: Option<Value>,
    pub password: Option<Value>,
}

/// Handles account registration and self-service.
#[derive(Debug, Clone)]
pub struct AccountService {
    /// Account store.
    accounts: Arc<dyn AccountStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password complexity policy.
    policy: Arc<PasswordValidator>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<PasswordHasher>,
        policy: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            policy,
        }
    }

    /// Register a new account. All field failures are reported together;
    /// a taken email surfaces as a constraint violation from the store.
    pub async fn create(&self, req: CreateAccountRequest) -> AppResult<Account> {
        let mut errors = FieldErrors::new();

        let email = text_field(&mut errors, "email", req.email.as_ref());
        let full_name = text_field(&mut errors, "fullName", req.full_name.as_ref());
        let password = text_field(&mut errors, "password", req.password.as_ref());

        let checks = [
            email.map(validation::email),
            full_name.map(validation::full_name),
            password.map(|p| validation::password(p, &self.policy)),
        ];
        for failure in checks.into_iter().flatten().flatten() {
            errors.push(failure);
        }
        errors.into_result()?;

        // Every field is present and valid past this point.
        let (Some(Some(email)), Some(Some(full_name)), Some(Some(password))) =
            (email, full_name, password)
        else {
            return Err(AppError::internal("validated account fields missing"));
        };

        let password_hash = self.hasher.hash_password(password)?;
        let account = self
            .accounts
            .create(NewAccount {
                email: email.trim().to_string(),
                full_name: full_name.to_string(),
                password_hash,
            })
            .await?;

        info!(account_id = %account.id, "Account created");
        Ok(account)
    }

    /// The caller's own account.
    pub async fn get(&self, ctx: &RequestContext) -> AppResult<Account> {
        self.accounts
            .find_by_id(ctx.account_id)
            .await?
            .ok_or_else(|| AppError::not_found(ErrorCode::AccountNotFound))
    }

    /// Apply a partial update to `target`, which must be the caller.
    ///
    /// Only whitelisted fields are accepted. Any unknown field or failed
    /// validation rejects the whole patch; nothing is written.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        target: &str,
        patch: &Map<String, Value>,
    ) -> AppResult<Account> {
        let target_id = target
            .parse::<AccountId>()
            .ok()
            .filter(|id| *id == ctx.account_id)
            .ok_or_else(|| AppError::not_found(ErrorCode::AccountNotFound))?;

        let mut errors = FieldErrors::new();
        let mut changes = AccountChanges::default();
        let mut new_password = None;

        for (name, value) in patch {
            let Some(field) = AccountField::from_name(name) else {
                errors.add(ErrorCode::UnsupportedField, name.as_str());
                continue;
            };
            let Some(text) = value.as_str() else {
                errors.add(ErrorCode::NotAString, name.as_str());
                continue;
            };
            if let Some(failure) = field.validate(text, &self.policy) {
                errors.push(failure);
                continue;
            }
            match field {
                AccountField::Email => changes.email = Some(text.trim().to_string()),
                AccountField::FullName => changes.full_name = Some(text.to_string()),
                AccountField::Password => new_password = Some(text),
            }
        }
        errors.into_result()?;

        if let Some(password) = new_password {
            changes.password_hash = Some(self.hasher.hash_password(password)?);
        }

        let account = self
            .accounts
            .update(target_id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found(ErrorCode::AccountNotFound))?;

        if !changes.is_empty() {
            info!(account_id = %account.id, "Account updated");
        }
        Ok(account)
    }
}

/// Read an optional string field. `Some(None)` means absent, `None` means
/// present with the wrong type (already recorded).
fn text_field<'a>(
    errors: &mut FieldErrors,
    name: &str,
    value: Option<&'a Value>,
) -> Option<Option<&'a str>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(text)) => Some(Some(text.as_str())),
        Some(_) => {
            errors.push(FieldError::new(ErrorCode::NotAString, name));
            None
        }
    }
}
