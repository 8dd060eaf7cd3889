use thiserror::Error;

use crate::domain::users::{UserError, ValidationError};

/// Errors raised while talking to the identity provider or routing its users
#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("An account with this phone number or email already exists")]
  UsernameExists,

  #[error("Account has not been confirmed yet")]
  NotConfirmed,

  #[error("Invalid or expired confirmation code")]
  InvalidCode,

  #[error("Invalid or expired session")]
  InvalidSession,

  #[error("Passwords do not match")]
  PasswordMismatch,

  #[error("Password must be between {min} and {max} characters")]
  InvalidPassword { min: usize, max: usize },

  #[error("Enter a registered email or a 10 digit phone number")]
  InvalidLogin,

  #[error("OAuth state did not match")]
  StateMismatch,

  #[error("Authorization code exchange failed: {0}")]
  CodeExchange(String),

  #[error("Identity provider error: {0}")]
  Provider(String),

  #[error("Identity provider is not configured: {0}")]
  NotConfigured(String),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  User(#[from] UserError),
}
