use std::sync::Arc;

use crate::application::users::{CreateProfileCommand, UpdateProfileCommand};
use crate::domain::identity::{IdentityClaims, IdentityError};
use crate::domain::users::{SubjectId, User, UserService};

/// Command for the complete-profile form
#[derive(Debug, Clone)]
pub struct CompleteProfileCommand {
  pub email: String,
  pub name: String,
  pub phone_number: String,
  pub state: String,
  pub city: String,
  pub role: Option<String>,
}

/// Use case for filling in the profile of a signed-in user.
///
/// Social sign-ins arrive without a profile, so one is created; a user
/// who already has one gets it updated instead.
pub struct CompleteProfileUseCase {
  user_service: Arc<UserService>,
  default_country_code: String,
}

impl CompleteProfileUseCase {
  pub fn new(user_service: Arc<UserService>, default_country_code: impl Into<String>) -> Self {
    Self {
      user_service,
      default_country_code: default_country_code.into(),
    }
  }

  pub async fn execute(
    &self,
    claims: &IdentityClaims,
    command: CompleteProfileCommand,
  ) -> Result<User, IdentityError> {
    let subject_id = SubjectId::new(claims.subject_id.as_str())?;
    let role = command.role.filter(|r| !r.trim().is_empty());

    let user = match self.user_service.find_profile(&subject_id).await? {
      Some(_) => {
        let update = UpdateProfileCommand {
          email: Some(command.email),
          name: Some(command.name),
          phone_number: Some(command.phone_number),
          state: Some(command.state),
          city: Some(command.city),
          role,
        }
        .into_update(&self.default_country_code)?;

        self.user_service.update_profile(&subject_id, update).await?
      }
      None => {
        let profile = CreateProfileCommand {
          subject_id: subject_id.into_inner(),
          email: command.email,
          name: command.name,
          phone_number: command.phone_number,
          state: command.state,
          city: command.city,
          role,
        }
        .into_profile(&self.default_country_code)?;

        self.user_service.create_profile(profile).await?
      }
    };

    let user = self
      .user_service
      .sync_verification(user, claims.phone_verified, claims.email_verified)
      .await?;

    Ok(user)
  }
}
