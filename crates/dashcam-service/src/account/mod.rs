//! Account registration, lookup and self-service updates.

pub mod service;
pub mod validation;

pub use service::{AccountService, CreateAccountRequest};
pub use validation::AccountField;
