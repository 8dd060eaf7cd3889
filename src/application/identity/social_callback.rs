use std::sync::Arc;

use crate::domain::identity::{Destination, IdentityError, IdentityService};

/// Query of the hosted UI callback, plus the state remembered in the cookie
#[derive(Debug, Clone, Default)]
pub struct SocialCallbackCommand {
  pub code: Option<String>,
  pub state: Option<String>,
  pub error: Option<String>,
  pub expected_state: Option<String>,
}

/// How the callback ends; every outcome is a redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialCallbackOutcome {
  /// No code was supplied; back to the landing page
  NoCode,
  /// Provider error, state mismatch or failed exchange
  Failed,
  SignedIn {
    access_token: String,
    expires_in_seconds: u64,
    destination: Destination,
  },
}

impl SocialCallbackOutcome {
  pub fn location(&self, base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');

    match self {
      SocialCallbackOutcome::NoCode => format!("{}/", base_url),
      SocialCallbackOutcome::Failed => format!("{}/?error=auth_failed", base_url),
      SocialCallbackOutcome::SignedIn { destination, .. } => destination.location(base_url),
    }
  }
}

/// Use case for finishing a hosted UI sign-in
pub struct SocialCallbackUseCase {
  identity_service: Arc<IdentityService>,
}

impl SocialCallbackUseCase {
  pub fn new(identity_service: Arc<IdentityService>) -> Self {
    Self { identity_service }
  }

  /// Never fails; errors are logged and turned into `Failed`
  pub async fn execute(&self, command: SocialCallbackCommand) -> SocialCallbackOutcome {
    if let Some(error) = command.error.as_deref() {
      tracing::warn!(error, "Hosted UI returned an error");
      return SocialCallbackOutcome::Failed;
    }

    let Some(code) = command.code.as_deref().filter(|c| !c.trim().is_empty()) else {
      return SocialCallbackOutcome::NoCode;
    };

    match self.sign_in(code, &command).await {
      Ok(outcome) => outcome,
      Err(e) => {
        tracing::warn!(error = %e, "Social login failed");
        SocialCallbackOutcome::Failed
      }
    }
  }

  async fn sign_in(
    &self,
    code: &str,
    command: &SocialCallbackCommand,
  ) -> Result<SocialCallbackOutcome, IdentityError> {
    match (command.state.as_deref(), command.expected_state.as_deref()) {
      (Some(state), Some(expected)) if state == expected => {}
      _ => return Err(IdentityError::StateMismatch),
    }

    let authenticated = self.identity_service.complete_social_login(code).await?;

    Ok(SocialCallbackOutcome::SignedIn {
      access_token: authenticated.tokens.access_token,
      expires_in_seconds: authenticated.tokens.expires_in_seconds,
      destination: authenticated.destination,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::identity::{IdentityClaims, IdentitySettings};
  use crate::domain::users::{User, UserService};
  use crate::infrastructure::identity::SimulatedIdentityProvider;
  use crate::test_support::{InMemoryUserRepository, sample_profile};

  const BASE: &str = "http://localhost:3000";

  fn setup() -> (SocialCallbackUseCase, Arc<InMemoryUserRepository>) {
    let repo = Arc::new(InMemoryUserRepository::default());
    let service = IdentityService::new(
      Arc::new(SimulatedIdentityProvider::new(BASE)),
      Arc::new(UserService::new(repo.clone())),
      IdentitySettings::default(),
    );
    (SocialCallbackUseCase::new(Arc::new(service)), repo)
  }

  fn code_for(subject_id: &str) -> String {
    SimulatedIdentityProvider::encode_code(&IdentityClaims {
      subject_id: subject_id.to_string(),
      email: Some("john@example.com".to_string()),
      name: Some("John Doe".to_string()),
      ..Default::default()
    })
  }

  fn command(code: Option<String>) -> SocialCallbackCommand {
    SocialCallbackCommand {
      code,
      state: Some("abc".to_string()),
      expected_state: Some("abc".to_string()),
      error: None,
    }
  }

  #[tokio::test]
  async fn test_missing_code_goes_home() {
    let (use_case, _) = setup();

    let outcome = use_case.execute(command(None)).await;
    assert_eq!(outcome, SocialCallbackOutcome::NoCode);
    assert_eq!(outcome.location(BASE), "http://localhost:3000/");

    let outcome = use_case.execute(command(Some(String::new()))).await;
    assert_eq!(outcome, SocialCallbackOutcome::NoCode);
  }

  #[tokio::test]
  async fn test_provider_error_fails() {
    let (use_case, _) = setup();

    let outcome = use_case
      .execute(SocialCallbackCommand {
        error: Some("access_denied".to_string()),
        ..command(Some(code_for("google_1")))
      })
      .await;

    assert_eq!(
      outcome.location(BASE),
      "http://localhost:3000/?error=auth_failed"
    );
  }

  #[tokio::test]
  async fn test_state_mismatch_fails() {
    let (use_case, _) = setup();

    let outcome = use_case
      .execute(SocialCallbackCommand {
        expected_state: Some("other".to_string()),
        ..command(Some(code_for("google_1")))
      })
      .await;
    assert_eq!(outcome, SocialCallbackOutcome::Failed);

    let outcome = use_case
      .execute(SocialCallbackCommand {
        expected_state: None,
        ..command(Some(code_for("google_1")))
      })
      .await;
    assert_eq!(outcome, SocialCallbackOutcome::Failed);
  }

  #[tokio::test]
  async fn test_bad_code_fails() {
    let (use_case, _) = setup();

    let outcome = use_case
      .execute(command(Some("%%%".to_string())))
      .await;
    assert_eq!(outcome, SocialCallbackOutcome::Failed);
  }

  #[tokio::test]
  async fn test_new_user_completes_profile() {
    let (use_case, _) = setup();

    let outcome = use_case.execute(command(Some(code_for("google_1")))).await;

    assert!(matches!(outcome, SocialCallbackOutcome::SignedIn { .. }));
    assert_eq!(
      outcome.location(BASE),
      "http://localhost:3000/auth/complete-profile?name=John+Doe&email=john%40example.com"
    );
  }

  #[tokio::test]
  async fn test_user_with_phone_goes_to_chat() {
    let (use_case, repo) = setup();
    repo.insert(User::new(sample_profile("google_1")));

    let outcome = use_case.execute(command(Some(code_for("google_1")))).await;

    assert_eq!(outcome.location(BASE), "http://localhost:3000/chat");
  }
}
