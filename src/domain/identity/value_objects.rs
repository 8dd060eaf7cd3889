use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::IdentityError;

/// Username registered with the identity provider.
///
/// Phone sign-ups use a synthetic address, `{phone}@{domain}`, so that the
/// pool can keep email as its username attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
  const PHONE_DIGITS: usize = 10;

  /// Username for a 10 digit national phone number
  pub fn for_phone(phone: &str, synthetic_domain: &str) -> Result<Self, IdentityError> {
    let compact: String = phone
      .trim()
      .chars()
      .filter(|c| !matches!(c, ' ' | '-'))
      .collect();

    if compact.len() != Self::PHONE_DIGITS || !compact.chars().all(|c| c.is_ascii_digit()) {
      return Err(IdentityError::InvalidLogin);
    }

    Ok(Self(format!("{}@{}", compact, synthetic_domain)))
  }

  /// Username for a sign-in identifier: emails are used as typed,
  /// anything else is treated as a phone number
  pub fn from_login(identifier: &str, synthetic_domain: &str) -> Result<Self, IdentityError> {
    let identifier = identifier.trim();

    if identifier.contains('@') {
      return Ok(Self(identifier.to_lowercase()));
    }

    Self::for_phone(identifier, synthetic_domain)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Username {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Plain password, only ever forwarded to the identity provider
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  const MIN_LENGTH: usize = 8;
  const MAX_LENGTH: usize = 128;

  pub fn new(password: impl Into<String>) -> Result<Self, IdentityError> {
    let password = password.into();
    let len = password.chars().count();

    if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&len) {
      return Err(IdentityError::InvalidPassword {
        min: Self::MIN_LENGTH,
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(password))
  }

  /// Checks the confirmation field of a sign-up form
  pub fn confirmed(password: String, confirmation: &str) -> Result<Self, IdentityError> {
    if password != confirmation {
      return Err(IdentityError::PasswordMismatch);
    }
    Self::new(password)
  }

  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

/// Federated identity providers offered through the hosted UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
  Google,
  Facebook,
  Apple,
}

impl SocialProvider {
  /// Name of the provider as configured in the user pool
  pub fn pool_name(&self) -> &'static str {
    match self {
      SocialProvider::Google => "Google",
      SocialProvider::Facebook => "Facebook",
      SocialProvider::Apple => "SignInWithApple",
    }
  }
}

impl FromStr for SocialProvider {
  type Err = IdentityError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "google" => Ok(SocialProvider::Google),
      "facebook" => Ok(SocialProvider::Facebook),
      "apple" | "signinwithapple" => Ok(SocialProvider::Apple),
      other => Err(IdentityError::NotConfigured(format!(
        "unknown social provider '{}'",
        other
      ))),
    }
  }
}
