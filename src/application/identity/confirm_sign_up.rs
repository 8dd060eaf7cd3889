use std::sync::Arc;

use crate::domain::identity::{IdentityError, IdentityService, Username};

/// Command for the confirmation-code form
#[derive(Debug, Clone)]
pub struct ConfirmSignUpCommand {
  pub phone_number: String,
  pub code: String,
}

/// Use case for confirming a freshly registered account
pub struct ConfirmSignUpUseCase {
  identity_service: Arc<IdentityService>,
}

impl ConfirmSignUpUseCase {
  pub fn new(identity_service: Arc<IdentityService>) -> Self {
    Self { identity_service }
  }

  pub async fn execute(&self, command: ConfirmSignUpCommand) -> Result<(), IdentityError> {
    let username = Username::for_phone(
      &command.phone_number,
      &self.identity_service.settings().synthetic_email_domain,
    )?;

    self
      .identity_service
      .confirm_sign_up(&username, &command.code)
      .await?;

    tracing::info!(username = %username, "Account confirmed");
    Ok(())
  }
}
