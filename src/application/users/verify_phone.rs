use std::sync::Arc;

use super::lookup_subject_id;
use crate::domain::users::{User, UserError, UserService};

/// Use case for marking a profile's phone number as verified
pub struct VerifyPhoneUseCase {
  user_service: Arc<UserService>,
}

impl VerifyPhoneUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  /// Idempotent; verifying twice returns the same record
  pub async fn execute(&self, subject_id: &str) -> Result<User, UserError> {
    let subject_id = lookup_subject_id(subject_id)?;
    self.user_service.verify_phone(&subject_id).await
  }
}
