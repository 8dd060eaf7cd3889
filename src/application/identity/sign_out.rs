use std::sync::Arc;

use crate::domain::identity::{IdentityError, IdentityService};

/// Use case for signing out of every device
pub struct SignOutUseCase {
  identity_service: Arc<IdentityService>,
}

impl SignOutUseCase {
  pub fn new(identity_service: Arc<IdentityService>) -> Self {
    Self { identity_service }
  }

  pub async fn execute(&self, access_token: &str) -> Result<(), IdentityError> {
    self.identity_service.sign_out(access_token).await
  }
}
