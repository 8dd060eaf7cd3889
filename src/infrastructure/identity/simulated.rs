use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::identity::{
  AuthTokens, IdentityClaims, IdentityError, IdentityProvider, Password, SignUpOutcome,
  SignUpRequest, SocialProvider, Username,
};

const TOKEN_TTL_SECONDS: u64 = 3600;

/// Claims embedded in a simulated authorization code
#[derive(Debug, Serialize, Deserialize)]
struct CodeClaims {
  sub: String,
  #[serde(default)]
  email: Option<String>,
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  phone_number: Option<String>,
  #[serde(default)]
  email_verified: bool,
  #[serde(default)]
  phone_verified: bool,
}

struct Account {
  subject_id: String,
  password: String,
  name: String,
  email: String,
  phone_number: String,
  confirmed: bool,
}

struct Session {
  claims: IdentityClaims,
  expires_at: DateTime<Utc>,
}

impl Session {
  fn is_live(&self, now: DateTime<Utc>) -> bool {
    self.expires_at > now
  }
}

#[derive(Default)]
struct SimulatedState {
  accounts: HashMap<String, Account>,
  sessions: HashMap<String, Session>,
}

/// In-memory identity provider for local development and tests.
///
/// Accounts are confirmed with [`Self::CONFIRMATION_CODE`]. Authorization
/// codes are URL-safe base64 JSON claims, so any caller can mint one with
/// [`Self::encode_code`].
pub struct SimulatedIdentityProvider {
  base_url: String,
  session_ttl_seconds: u64,
  state: RwLock<SimulatedState>,
}

impl SimulatedIdentityProvider {
  pub const CONFIRMATION_CODE: &'static str = "123456";

  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
      session_ttl_seconds: TOKEN_TTL_SECONDS,
      state: RwLock::new(SimulatedState::default()),
    }
  }

  /// Overrides how long issued access tokens stay valid
  pub fn with_session_ttl(mut self, ttl_seconds: u64) -> Self {
    self.session_ttl_seconds = ttl_seconds;
    self
  }

  /// Builds an authorization code carrying `claims`
  pub fn encode_code(claims: &IdentityClaims) -> String {
    let code = CodeClaims {
      sub: claims.subject_id.clone(),
      email: claims.email.clone(),
      name: claims.name.clone(),
      phone_number: claims.phone_number.clone(),
      email_verified: claims.email_verified,
      phone_verified: claims.phone_verified,
    };
    // Serializing a struct of strings and bools cannot fail
    let json = serde_json::to_vec(&code).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
  }

  fn decode_code(code: &str) -> Result<IdentityClaims, IdentityError> {
    let bytes = URL_SAFE_NO_PAD
      .decode(code.trim())
      .map_err(|e| IdentityError::CodeExchange(e.to_string()))?;
    let code: CodeClaims =
      serde_json::from_slice(&bytes).map_err(|e| IdentityError::CodeExchange(e.to_string()))?;

    if code.sub.trim().is_empty() {
      return Err(IdentityError::CodeExchange(
        "code carries no subject".to_string(),
      ));
    }

    Ok(IdentityClaims {
      subject_id: code.sub,
      email: code.email,
      name: code.name,
      phone_number: code.phone_number,
      email_verified: code.email_verified,
      phone_verified: code.phone_verified,
    })
  }

  /// Expired sessions are pruned whenever a new one is issued
  async fn issue_tokens(&self, claims: IdentityClaims) -> AuthTokens {
    let access_token = Uuid::new_v4().to_string();
    let now = Utc::now();
    let ttl = i64::try_from(self.session_ttl_seconds).unwrap_or(i64::MAX);
    let expires_at = Duration::try_seconds(ttl)
      .and_then(|ttl| now.checked_add_signed(ttl))
      .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let mut state = self.state.write().await;
    state.sessions.retain(|_, session| session.is_live(now));
    state
      .sessions
      .insert(access_token.clone(), Session { claims, expires_at });

    AuthTokens {
      access_token,
      id_token: None,
      refresh_token: None,
      expires_in_seconds: self.session_ttl_seconds,
    }
  }
}

#[async_trait]
impl IdentityProvider for SimulatedIdentityProvider {
  async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, IdentityError> {
    let mut state = self.state.write().await;

    if state.accounts.contains_key(request.username.as_str()) {
      return Err(IdentityError::UsernameExists);
    }

    let subject_id = Uuid::new_v4().to_string();
    state.accounts.insert(
      request.username.as_str().to_string(),
      Account {
        subject_id: subject_id.clone(),
        password: request.password.expose().to_string(),
        name: request.name,
        email: request.email,
        phone_number: request.phone_number,
        confirmed: false,
      },
    );

    tracing::debug!(username = %request.username, "Simulated sign-up");

    Ok(SignUpOutcome {
      subject_id,
      confirmed: false,
    })
  }

  async fn confirm_sign_up(&self, username: &Username, code: &str) -> Result<(), IdentityError> {
    let mut state = self.state.write().await;
    let account = state
      .accounts
      .get_mut(username.as_str())
      .ok_or(IdentityError::InvalidCredentials)?;

    if code != Self::CONFIRMATION_CODE {
      return Err(IdentityError::InvalidCode);
    }

    account.confirmed = true;
    Ok(())
  }

  async fn sign_in(
    &self,
    username: &Username,
    password: &Password,
  ) -> Result<AuthTokens, IdentityError> {
    let claims = {
      let state = self.state.read().await;
      let account = state
        .accounts
        .get(username.as_str())
        .filter(|account| account.password == password.expose())
        .ok_or(IdentityError::InvalidCredentials)?;

      if !account.confirmed {
        return Err(IdentityError::NotConfirmed);
      }

      IdentityClaims {
        subject_id: account.subject_id.clone(),
        email: Some(account.email.clone()),
        name: Some(account.name.clone()),
        phone_number: Some(account.phone_number.clone()),
        email_verified: false,
        phone_verified: true,
      }
    };

    Ok(self.issue_tokens(claims).await)
  }

  async fn current_user(&self, access_token: &str) -> Result<IdentityClaims, IdentityError> {
    self
      .state
      .read()
      .await
      .sessions
      .get(access_token)
      .filter(|session| session.is_live(Utc::now()))
      .map(|session| session.claims.clone())
      .ok_or(IdentityError::InvalidSession)
  }

  async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
    let mut state = self.state.write().await;
    let subject_id = state
      .sessions
      .get(access_token)
      .map(|session| session.claims.subject_id.clone())
      .ok_or(IdentityError::InvalidSession)?;

    state
      .sessions
      .retain(|_, session| session.claims.subject_id != subject_id);
    Ok(())
  }

  fn authorization_url(
    &self,
    provider: SocialProvider,
    state: &str,
  ) -> Result<String, IdentityError> {
    // Skip the consent screen and come straight back with a demo identity
    let code = Self::encode_code(&IdentityClaims {
      subject_id: format!("{}_simulated", provider.pool_name().to_lowercase()),
      email: Some("john@example.com".to_string()),
      name: Some("John Doe".to_string()),
      email_verified: true,
      ..Default::default()
    });

    let query = serde_urlencoded::to_string([("code", code.as_str()), ("state", state)])
      .map_err(|e| IdentityError::Provider(e.to_string()))?;

    Ok(format!(
      "{}/api/auth/social-callback?{}",
      self.base_url, query
    ))
  }

  async fn exchange_code(&self, code: &str) -> Result<(AuthTokens, IdentityClaims), IdentityError> {
    let claims = Self::decode_code(code)?;
    let tokens = self.issue_tokens(claims.clone()).await;
    Ok((tokens, claims))
  }
}
