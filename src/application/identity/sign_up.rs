use std::sync::Arc;

use crate::domain::identity::{IdentityError, IdentityService, Password, SignUpDetails, Username};
use crate::domain::users::{DisplayName, Locality, PhoneNumber, User, UserRole};

/// Command for the sign-up form
#[derive(Debug, Clone)]
pub struct SignUpCommand {
  pub name: String,
  /// 10 digit national number
  pub phone_number: String,
  pub state: String,
  pub city: String,
  pub role: Option<String>,
  pub password: String,
  pub confirm_password: String,
}

/// Response after a successful sign-up
#[derive(Debug, Clone)]
pub struct SignUpResponse {
  /// Stored profile, not yet verified
  pub user: User,
  /// Digits the confirmation form should be prefilled with
  pub phone_digits: String,
}

/// Use case for registering a phone-based account and its profile
pub struct SignUpUseCase {
  identity_service: Arc<IdentityService>,
}

impl SignUpUseCase {
  pub fn new(identity_service: Arc<IdentityService>) -> Self {
    Self { identity_service }
  }

  /// # Errors
  /// `IdentityError::PasswordMismatch` when the two password fields differ,
  /// `IdentityError::InvalidLogin` unless the phone number has 10 digits,
  /// and `IdentityError::UsernameExists` for an already registered number
  pub async fn execute(&self, command: SignUpCommand) -> Result<SignUpResponse, IdentityError> {
    let settings = self.identity_service.settings();

    let password = Password::confirmed(command.password, &command.confirm_password)?;
    let username = Username::for_phone(&command.phone_number, &settings.synthetic_email_domain)?;
    let phone_number = PhoneNumber::parse(&command.phone_number, &settings.default_country_code)?;
    let role = match command.role.as_deref().filter(|r| !r.trim().is_empty()) {
      Some(role) => role.parse::<UserRole>()?,
      None => UserRole::default(),
    };

    let details = SignUpDetails {
      username,
      password,
      name: DisplayName::new(command.name)?,
      phone_number,
      state: Locality::state(command.state)?,
      city: Locality::city(command.city)?,
      role,
    };

    let user = self.identity_service.sign_up(details).await?;
    let phone_digits = command
      .phone_number
      .chars()
      .filter(char::is_ascii_digit)
      .collect();

    Ok(SignUpResponse { user, phone_digits })
  }
}
