use std::sync::Arc;

use super::lookup_subject_id;
use crate::domain::users::{User, UserError, UserService};

/// Use case for fetching a profile by subject id
pub struct GetProfileUseCase {
  user_service: Arc<UserService>,
}

impl GetProfileUseCase {
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  pub async fn execute(&self, subject_id: &str) -> Result<User, UserError> {
    let subject_id = lookup_subject_id(subject_id)?;
    self.user_service.get_profile(&subject_id).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{InMemoryUserRepository, sample_profile};

  #[tokio::test]
  async fn test_get_existing_and_missing() {
    let repo = Arc::new(InMemoryUserRepository::default());
    repo.insert(User::new(sample_profile("sub-1")));
    let use_case = GetProfileUseCase::new(Arc::new(UserService::new(repo)));

    let user = use_case.execute("sub-1").await.unwrap();
    assert_eq!(user.name, "Asha Rao");

    assert!(matches!(
      use_case.execute("sub-2").await,
      Err(UserError::NotFound)
    ));
  }

  #[tokio::test]
  async fn test_unparseable_subject_is_not_found() {
    let repo = Arc::new(InMemoryUserRepository::default());
    let use_case = GetProfileUseCase::new(Arc::new(UserService::new(repo)));

    let too_long = "x".repeat(129);

    for sub in ["has space", too_long.as_str()] {
      assert!(matches!(
        use_case.execute(sub).await,
        Err(UserError::NotFound)
      ));
    }
  }
}
