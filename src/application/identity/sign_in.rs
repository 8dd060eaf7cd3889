use std::sync::Arc;

use crate::domain::identity::{Destination, IdentityError, IdentityService, Password, Username};

/// Command for the sign-in form
#[derive(Debug, Clone)]
pub struct SignInCommand {
  /// Email address or 10 digit phone number
  pub identifier: String,
  pub password: String,
}

/// Response after a successful sign-in
#[derive(Debug, Clone)]
pub struct SignInResponse {
  pub access_token: String,
  pub expires_in_seconds: u64,
  pub destination: Destination,
}

/// Use case for signing in with a password
pub struct SignInUseCase {
  identity_service: Arc<IdentityService>,
}

impl SignInUseCase {
  pub fn new(identity_service: Arc<IdentityService>) -> Self {
    Self { identity_service }
  }

  pub async fn execute(&self, command: SignInCommand) -> Result<SignInResponse, IdentityError> {
    let username = Username::from_login(
      &command.identifier,
      &self.identity_service.settings().synthetic_email_domain,
    )?;
    let password = Password::new(command.password).map_err(|_| IdentityError::InvalidCredentials)?;

    let authenticated = match self.identity_service.sign_in(&username, &password).await {
      Ok(authenticated) => authenticated,
      Err(e) => {
        tracing::warn!(username = %username, error = %e, "Sign-in failed");
        return Err(e);
      }
    };

    Ok(SignInResponse {
      access_token: authenticated.tokens.access_token,
      expires_in_seconds: authenticated.tokens.expires_in_seconds,
      destination: authenticated.destination,
    })
  }
}
