use std::sync::Arc;

use super::lookup_subject_id;
use crate::domain::users::{User, UserError, UserService};

/// Use case for marking a profile's email as verified
pub struct VerifyEmailUseCase {
  user_service: Arc<UserService>,
}

impl VerifyEmailUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, subject_id: &str) -> Result<User, UserError> {
    let subject_id = lookup_subject_id(subject_id)?;
    self.user_service.verify_email(&subject_id).await
  }
}
