use std::sync::Arc;

use crate::domain::users::{
  DisplayName, Email, Locality, NewProfile, PhoneNumber, SubjectId, User, UserRole, UserService,
};

use super::entities::{AuthTokens, Destination, IdentityClaims, SignUpRequest};
use super::errors::IdentityError;
use super::ports::IdentityProvider;
use super::value_objects::{Password, SocialProvider, Username};

/// Settings shared by every identity flow
#[derive(Debug, Clone)]
pub struct IdentitySettings {
  /// Domain of the synthetic email used as username for phone sign-ups
  pub synthetic_email_domain: String,
  /// Prefix added to 10 digit national phone numbers
  pub default_country_code: String,
}

impl Default for IdentitySettings {
  fn default() -> Self {
    Self {
      synthetic_email_domain: "digilaw.temp".to_string(),
      default_country_code: "+91".to_string(),
    }
  }
}

/// Validated sign-up form
#[derive(Debug, Clone)]
pub struct SignUpDetails {
  pub username: Username,
  pub password: Password,
  pub name: DisplayName,
  pub phone_number: PhoneNumber,
  pub state: Locality,
  pub city: Locality,
  pub role: UserRole,
}

/// Result of a successful sign-in or code exchange
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub tokens: AuthTokens,
  pub claims: IdentityClaims,
  pub destination: Destination,
}

/// Identity flows that span the provider and the profile table
pub struct IdentityService {
  provider: Arc<dyn IdentityProvider>,
  user_service: Arc<UserService>,
  settings: IdentitySettings,
}

impl IdentityService {
  pub fn new(
    provider: Arc<dyn IdentityProvider>,
    user_service: Arc<UserService>,
    settings: IdentitySettings,
  ) -> Self {
    Self {
      provider,
      user_service,
      settings,
    }
  }

  pub fn settings(&self) -> &IdentitySettings {
    &self.settings
  }

  /// Registers the account with the provider, then stores the profile
  /// under the subject id the provider assigned
  pub async fn sign_up(&self, details: SignUpDetails) -> Result<User, IdentityError> {
    let email = Email::new(details.username.as_str())?;

    let outcome = self
      .provider
      .sign_up(SignUpRequest {
        username: details.username.clone(),
        password: details.password,
        name: details.name.as_str().to_string(),
        email: email.as_str().to_string(),
        phone_number: details.phone_number.as_str().to_string(),
      })
      .await?;

    let profile = NewProfile {
      subject_id: SubjectId::new(outcome.subject_id)?,
      email,
      name: details.name,
      phone_number: details.phone_number,
      state: details.state,
      city: details.city,
      role: details.role,
    };

    let user = self.user_service.create_profile(profile).await?;
    tracing::info!(
      user_id = %user.id,
      confirmed = outcome.confirmed,
      "Signed up new account"
    );

    Ok(user)
  }

  pub async fn confirm_sign_up(
    &self,
    username: &Username,
    code: &str,
  ) -> Result<(), IdentityError> {
    let code = code.trim();
    if code.is_empty() {
      return Err(IdentityError::InvalidCode);
    }

    self.provider.confirm_sign_up(username, code).await
  }

  pub async fn sign_in(
    &self,
    username: &Username,
    password: &Password,
  ) -> Result<AuthenticatedUser, IdentityError> {
    let tokens = self.provider.sign_in(username, password).await?;
    let claims = self.provider.current_user(&tokens.access_token).await?;
    let destination = self.route(&claims).await?;

    tracing::info!(destination = ?destination, "Signed in");

    Ok(AuthenticatedUser {
      tokens,
      claims,
      destination,
    })
  }

  pub async fn resolve_session(&self, access_token: &str) -> Result<IdentityClaims, IdentityError> {
    self.provider.current_user(access_token).await
  }

  pub async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
    self.provider.sign_out(access_token).await
  }

  pub fn social_login_url(
    &self,
    provider: SocialProvider,
    state: &str,
  ) -> Result<String, IdentityError> {
    self.provider.authorization_url(provider, state)
  }

  /// Exchanges the hosted UI code and decides where the user goes
  pub async fn complete_social_login(
    &self,
    code: &str,
  ) -> Result<AuthenticatedUser, IdentityError> {
    let (tokens, claims) = self.provider.exchange_code(code).await?;
    let destination = self.route(&claims).await?;

    tracing::info!(destination = ?destination, "Completed social login");

    Ok(AuthenticatedUser {
      tokens,
      claims,
      destination,
    })
  }

  /// Users with a phone number on file go to chat; everyone else
  /// completes their profile first
  pub async fn route(&self, claims: &IdentityClaims) -> Result<Destination, IdentityError> {
    let subject_id = SubjectId::new(claims.subject_id.as_str())?;

    let Some(user) = self.user_service.find_profile(&subject_id).await? else {
      return Ok(Destination::CompleteProfile {
        name: claims.name.clone(),
        email: claims.email.clone(),
      });
    };

    let user = self
      .user_service
      .sync_verification(user, claims.phone_verified, claims.email_verified)
      .await?;

    if user.has_phone_number() {
      Ok(Destination::Chat)
    } else {
      Ok(Destination::CompleteProfile {
        name: Some(user.name),
        email: Some(user.email),
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::identity::SimulatedIdentityProvider;
  use crate::test_support::{InMemoryUserRepository, sample_profile};

  fn setup() -> (
    IdentityService,
    Arc<SimulatedIdentityProvider>,
    Arc<InMemoryUserRepository>,
  ) {
    let repo = Arc::new(InMemoryUserRepository::default());
    let provider = Arc::new(SimulatedIdentityProvider::new("http://localhost:8080"));
    let user_service = Arc::new(UserService::new(repo.clone()));
    let service = IdentityService::new(
      provider.clone(),
      user_service,
      IdentitySettings::default(),
    );
    (service, provider, repo)
  }

  fn details(phone: &str) -> SignUpDetails {
    let settings = IdentitySettings::default();
    SignUpDetails {
      username: Username::for_phone(phone, &settings.synthetic_email_domain).unwrap(),
      password: Password::new("Secret123!").unwrap(),
      name: DisplayName::new("Ravi Kumar").unwrap(),
      phone_number: PhoneNumber::parse(phone, &settings.default_country_code).unwrap(),
      state: Locality::state("Karnataka").unwrap(),
      city: Locality::city("Mysuru").unwrap(),
      role: UserRole::Student,
    }
  }

  #[tokio::test]
  async fn test_sign_up_creates_profile_under_provider_subject() {
    let (service, _, repo) = setup();

    let user = service.sign_up(details("9123456789")).await.unwrap();

    assert_eq!(user.email, "9123456789@digilaw.temp");
    assert_eq!(user.phone_number, "+919123456789");
    assert_eq!(user.role, UserRole::Student);
    assert!(repo.get(&user.subject_id).is_some());
  }

  #[tokio::test]
  async fn test_sign_in_before_confirmation_fails() {
    let (service, _, _) = setup();
    service.sign_up(details("9123456789")).await.unwrap();

    let username = Username::for_phone("9123456789", "digilaw.temp").unwrap();
    let result = service
      .sign_in(&username, &Password::new("Secret123!").unwrap())
      .await;

    assert!(matches!(result, Err(IdentityError::NotConfirmed)));
  }

  #[tokio::test]
  async fn test_confirmed_sign_in_routes_to_chat_and_verifies_phone() {
    let (service, _, repo) = setup();
    let user = service.sign_up(details("9123456789")).await.unwrap();
    let username = Username::for_phone("9123456789", "digilaw.temp").unwrap();

    service
      .confirm_sign_up(&username, SimulatedIdentityProvider::CONFIRMATION_CODE)
      .await
      .unwrap();
    let signed_in = service
      .sign_in(&username, &Password::new("Secret123!").unwrap())
      .await
      .unwrap();

    assert_eq!(signed_in.destination, Destination::Chat);
    assert!(repo.get(&user.subject_id).unwrap().phone_verified);
  }

  #[tokio::test]
  async fn test_wrong_confirmation_code() {
    let (service, _, _) = setup();
    service.sign_up(details("9123456789")).await.unwrap();
    let username = Username::for_phone("9123456789", "digilaw.temp").unwrap();

    let result = service.confirm_sign_up(&username, "000000").await;
    assert!(matches!(result, Err(IdentityError::InvalidCode)));

    let result = service.confirm_sign_up(&username, "  ").await;
    assert!(matches!(result, Err(IdentityError::InvalidCode)));
  }

  #[tokio::test]
  async fn test_route_without_profile_asks_for_completion() {
    let (service, _, _) = setup();
    let claims = IdentityClaims {
      subject_id: "google_123".to_string(),
      email: Some("john@example.com".to_string()),
      name: Some("John Doe".to_string()),
      ..Default::default()
    };

    let destination = service.route(&claims).await.unwrap();

    assert_eq!(
      destination,
      Destination::CompleteProfile {
        name: Some("John Doe".to_string()),
        email: Some("john@example.com".to_string()),
      }
    );
  }

  #[tokio::test]
  async fn test_route_with_profile_but_no_phone() {
    let (service, _, repo) = setup();
    let mut user = User::new(sample_profile("google_123"));
    user.phone_number = String::new();
    repo.insert(user);

    let claims = IdentityClaims {
      subject_id: "google_123".to_string(),
      ..Default::default()
    };

    assert!(matches!(
      service.route(&claims).await.unwrap(),
      Destination::CompleteProfile { .. }
    ));
  }

  #[tokio::test]
  async fn test_social_login_with_existing_profile_goes_to_chat() {
    let (service, _, repo) = setup();
    repo.insert(User::new(sample_profile("google_123")));

    let code = SimulatedIdentityProvider::encode_code(&IdentityClaims {
      subject_id: "google_123".to_string(),
      email: Some("asha@example.com".to_string()),
      email_verified: true,
      ..Default::default()
    });

    let authenticated = service.complete_social_login(&code).await.unwrap();

    assert_eq!(authenticated.destination, Destination::Chat);
    assert!(!authenticated.tokens.access_token.is_empty());
    assert!(repo.get("google_123").unwrap().email_verified);
  }

  #[tokio::test]
  async fn test_social_login_with_garbage_code_fails() {
    let (service, _, _) = setup();

    let result = service.complete_social_login("not base64!").await;
    assert!(matches!(result, Err(IdentityError::CodeExchange(_))));
  }
}
