use std::sync::Arc;

use super::lookup_subject_id;
use crate::domain::users::{
  DisplayName, Email, Locality, PhoneNumber, ProfileUpdate, User, UserError, UserRole,
  UserService,
};

/// Command for a partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileCommand {
  pub email: Option<String>,
  pub name: Option<String>,
  pub phone_number: Option<String>,
  pub state: Option<String>,
  pub city: Option<String>,
  pub role: Option<String>,
}

impl UpdateProfileCommand {
  pub(crate) fn into_update(self, default_country_code: &str) -> Result<ProfileUpdate, UserError> {
    Ok(ProfileUpdate {
      email: self.email.map(Email::new).transpose()?,
      name: self.name.map(DisplayName::new).transpose()?,
      phone_number: self
        .phone_number
        .map(|phone| PhoneNumber::parse(&phone, default_country_code))
        .transpose()?,
      state: self.state.map(Locality::state).transpose()?,
      city: self.city.map(Locality::city).transpose()?,
      role: self
        .role
        .map(|role| role.parse::<UserRole>())
        .transpose()?,
    })
  }
}

/// Use case for merging changes into an existing profile
pub struct UpdateProfileUseCase {
  user_service: Arc<UserService>,
  default_country_code: String,
}

impl UpdateProfileUseCase {
  pub fn new(user_service: Arc<UserService>, default_country_code: impl Into<String>) -> Self {
    Self {
      user_service,
      default_country_code: default_country_code.into(),
    }
  }

  /// Verification flags are never touched, even when phone or email change
  pub async fn execute(
    &self,
    subject_id: &str,
    command: UpdateProfileCommand,
  ) -> Result<User, UserError> {
    let subject_id = lookup_subject_id(subject_id)?;
    let update = command.into_update(&self.default_country_code)?;
    self.user_service.update_profile(&subject_id, update).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::users::ValidationError;
  use crate::test_support::{InMemoryUserRepository, sample_profile};

  fn setup() -> (UpdateProfileUseCase, Arc<InMemoryUserRepository>) {
    let repo = Arc::new(InMemoryUserRepository::default());
    let mut user = User::new(sample_profile("sub-1"));
    user.verify_phone();
    repo.insert(user);
    (
      UpdateProfileUseCase::new(Arc::new(UserService::new(repo.clone())), "+91"),
      repo,
    )
  }

  #[tokio::test]
  async fn test_update_merges_supplied_fields_only() {
    let (use_case, _) = setup();

    let user = use_case
      .execute(
        "sub-1",
        UpdateProfileCommand {
          phone_number: Some("+44 20 7946 0958".to_string()),
          role: Some("Student".to_string()),
          ..Default::default()
        },
      )
      .await
      .unwrap();

    assert_eq!(user.phone_number, "+442079460958");
    assert_eq!(user.role, UserRole::Student);
    assert_eq!(user.city, "Kochi");
    assert!(user.phone_verified);
  }

  #[tokio::test]
  async fn test_empty_update_does_not_write() {
    let (use_case, repo) = setup();

    let user = use_case
      .execute("sub-1", UpdateProfileCommand::default())
      .await
      .unwrap();

    assert_eq!(user.name, "Asha Rao");
    assert_eq!(repo.update_count(), 0);
  }

  #[tokio::test]
  async fn test_invalid_field_rejected_before_lookup() {
    let (use_case, _) = setup();

    let result = use_case
      .execute(
        "nobody",
        UpdateProfileCommand {
          email: Some("not-an-email".to_string()),
          ..Default::default()
        },
      )
      .await;

    assert!(matches!(
      result,
      Err(UserError::Validation(ValidationError::InvalidEmail(_)))
    ));
  }

  #[tokio::test]
  async fn test_update_unknown_subject() {
    let (use_case, _) = setup();

    let result = use_case
      .execute(
        "nobody",
        UpdateProfileCommand {
          city: Some("Pune".to_string()),
          ..Default::default()
        },
      )
      .await;

    assert!(matches!(result, Err(UserError::NotFound)));
  }
}
