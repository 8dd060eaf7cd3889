use std::sync::Arc;

use crate::domain::users::{
  DisplayName, Email, Locality, NewProfile, PhoneNumber, SubjectId, User, UserError, UserRole,
  UserService,
};

/// Command for creating a profile
#[derive(Debug, Clone)]
pub struct CreateProfileCommand {
  /// Identity-provider subject id
  pub subject_id: String,
  pub email: String,
  pub name: String,
  /// Phone number as typed; normalised to E.164
  pub phone_number: String,
  pub state: String,
  pub city: String,
  /// Defaults to citizen when absent
  pub role: Option<String>,
}

impl CreateProfileCommand {
  pub(crate) fn into_profile(self, default_country_code: &str) -> Result<NewProfile, UserError> {
    let role = match self.role {
      Some(role) => role.parse::<UserRole>()?,
      None => UserRole::default(),
    };

    Ok(NewProfile {
      subject_id: SubjectId::new(self.subject_id)?,
      email: Email::new(self.email)?,
      name: DisplayName::new(self.name)?,
      phone_number: PhoneNumber::parse(&self.phone_number, default_country_code)?,
      state: Locality::state(self.state)?,
      city: Locality::city(self.city)?,
      role,
    })
  }
}

/// Use case for creating a profile
pub struct CreateProfileUseCase {
  user_service: Arc<UserService>,
  default_country_code: String,
}

impl CreateProfileUseCase {
  pub fn new(user_service: Arc<UserService>, default_country_code: impl Into<String>) -> Self {
    Self {
      user_service,
      default_country_code: default_country_code.into(),
    }
  }

  /// Creates the profile with both verification flags unset
  ///
  /// # Errors
  /// `UserError::Validation` for malformed input and
  /// `UserError::SubjectAlreadyExists` when the subject id is taken
  pub async fn execute(&self, command: CreateProfileCommand) -> Result<User, UserError> {
    let profile = command.into_profile(&self.default_country_code)?;
    self.user_service.create_profile(profile).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::users::ValidationError;
  use crate::test_support::InMemoryUserRepository;

  fn use_case() -> CreateProfileUseCase {
    let repo = Arc::new(InMemoryUserRepository::default());
    CreateProfileUseCase::new(Arc::new(UserService::new(repo)), "+91")
  }

  fn command() -> CreateProfileCommand {
    CreateProfileCommand {
      subject_id: "sub-1".to_string(),
      email: "Priya@Example.com".to_string(),
      name: "Priya Nair".to_string(),
      phone_number: "98765 43210".to_string(),
      state: "Kerala".to_string(),
      city: "Thrissur".to_string(),
      role: None,
    }
  }

  #[tokio::test]
  async fn test_create_normalises_fields() {
    let user = use_case().execute(command()).await.unwrap();

    assert_eq!(user.email, "priya@example.com");
    assert_eq!(user.phone_number, "+919876543210");
    assert_eq!(user.role, UserRole::Citizen);
    assert!(!user.phone_verified);
    assert!(!user.email_verified);
  }

  #[tokio::test]
  async fn test_create_rejects_unknown_role() {
    let result = use_case()
      .execute(CreateProfileCommand {
        role: Some("judge".to_string()),
        ..command()
      })
      .await;

    assert!(matches!(
      result,
      Err(UserError::Validation(ValidationError::InvalidRole(_)))
    ));
  }

  #[tokio::test]
  async fn test_create_twice_conflicts() {
    let use_case = use_case();
    use_case.execute(command()).await.unwrap();

    let result = use_case.execute(command()).await;
    assert!(matches!(result, Err(UserError::SubjectAlreadyExists)));
  }
}
