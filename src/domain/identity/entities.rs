use serde::{Deserialize, Serialize};

use super::value_objects::{Password, Username};

/// Attributes the identity provider reports for an authenticated user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
  pub subject_id: String,
  pub email: Option<String>,
  pub name: Option<String>,
  pub phone_number: Option<String>,
  #[serde(default)]
  pub email_verified: bool,
  #[serde(default)]
  pub phone_verified: bool,
}

/// Tokens issued by the identity provider
#[derive(Debug, Clone)]
pub struct AuthTokens {
  pub access_token: String,
  pub id_token: Option<String>,
  pub refresh_token: Option<String>,
  pub expires_in_seconds: u64,
}

/// Registration sent to the identity provider
#[derive(Debug, Clone)]
pub struct SignUpRequest {
  pub username: Username,
  pub password: Password,
  pub name: String,
  pub email: String,
  /// E.164
  pub phone_number: String,
}

#[derive(Debug, Clone)]
pub struct SignUpOutcome {
  pub subject_id: String,
  /// Whether the account is usable without a confirmation code
  pub confirmed: bool,
}

/// Where an authenticated user goes next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
  Chat,
  CompleteProfile {
    name: Option<String>,
    email: Option<String>,
  },
}

impl Destination {
  pub const CHAT_PATH: &'static str = "/chat";
  pub const COMPLETE_PROFILE_PATH: &'static str = "/auth/complete-profile";

  /// Absolute location under `base_url`
  pub fn location(&self, base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');

    match self {
      Destination::Chat => format!("{}{}", base_url, Self::CHAT_PATH),
      Destination::CompleteProfile { name, email } => {
        let params: Vec<(&str, &str)> = [("name", name), ("email", email)]
          .into_iter()
          .filter_map(|(key, value)| {
            value
              .as_deref()
              .filter(|v| !v.is_empty())
              .map(|v| (key, v))
          })
          .collect();

        let query = serde_urlencoded::to_string(&params).unwrap_or_default();
        if query.is_empty() {
          format!("{}{}", base_url, Self::COMPLETE_PROFILE_PATH)
        } else {
          format!("{}{}?{}", base_url, Self::COMPLETE_PROFILE_PATH, query)
        }
      }
    }
  }
}
