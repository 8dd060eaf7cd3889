use async_trait::async_trait;

use super::entities::{AuthTokens, IdentityClaims, SignUpOutcome, SignUpRequest};
use super::errors::IdentityError;
use super::value_objects::{Password, SocialProvider, Username};

/// Managed identity provider (allows both real and simulated implementations)
#[async_trait]
pub trait IdentityProvider: Send + Sync {
  /// Registers a new account and returns its subject id
  async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, IdentityError>;

  /// Confirms an account with the code sent to the user
  async fn confirm_sign_up(&self, username: &Username, code: &str) -> Result<(), IdentityError>;

  /// Authenticates with username and password
  async fn sign_in(
    &self,
    username: &Username,
    password: &Password,
  ) -> Result<AuthTokens, IdentityError>;

  /// Resolves an access token to the user's claims
  async fn current_user(&self, access_token: &str) -> Result<IdentityClaims, IdentityError>;

  /// Revokes every token issued to the user
  async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;

  /// Hosted UI URL for a federated sign-in
  fn authorization_url(
    &self,
    provider: SocialProvider,
    state: &str,
  ) -> Result<String, IdentityError>;

  /// Exchanges an authorization code from the hosted UI for tokens and claims
  async fn exchange_code(&self, code: &str) -> Result<(AuthTokens, IdentityClaims), IdentityError>;
}
