use std::sync::Arc;
use uuid::Uuid;

use crate::domain::identity::{IdentityError, IdentityService, SocialProvider};

/// Where to send the browser, and the state to remember until it returns
#[derive(Debug, Clone)]
pub struct SocialLoginResponse {
  pub authorization_url: String,
  pub state: String,
}

/// Use case for starting a hosted UI sign-in with a federated provider
pub struct SocialLoginUseCase {
  identity_service: Arc<IdentityService>,
}

impl SocialLoginUseCase {
  pub fn new(identity_service: Arc<IdentityService>) -> Self {
    Self { identity_service }
  }

  pub fn execute(&self, provider: &str) -> Result<SocialLoginResponse, IdentityError> {
    let provider: SocialProvider = provider.parse()?;
    let state = Uuid::new_v4().simple().to_string();
    let authorization_url = self.identity_service.social_login_url(provider, &state)?;

    Ok(SocialLoginResponse {
      authorization_url,
      state,
    })
  }
}
