use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

use super::errors::ValidationError;

lazy_static! {
  /// Characters people actually type into a phone field
  static ref PHONE_INPUT: Regex = Regex::new(r"^\+?[0-9 ()\-.]+$").expect("valid phone regex");
}

// ============================================================================
// Subject Id
// ============================================================================

/// Identity-provider subject identifier, the key into the profile table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
  const MAX_LENGTH: usize = 128;

  pub fn new(sub: impl Into<String>) -> Result<Self, ValidationError> {
    let sub = sub.into().trim().to_string();

    if sub.is_empty() {
      return Err(ValidationError::SubjectIdEmpty);
    }

    if sub.len() > Self::MAX_LENGTH || sub.chars().any(char::is_whitespace) {
      return Err(ValidationError::SubjectIdInvalid {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(sub))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for SubjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Email
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation, normalised to lowercase
  pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
    let email = email.into().trim().to_string();

    if !email.validate_email() {
      return Err(ValidationError::InvalidEmail(email));
    }

    Ok(Self(email.to_lowercase()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Phone Number
// ============================================================================

/// Phone number normalised to E.164
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
  const NATIONAL_DIGITS: usize = 10;
  const MIN_INTERNATIONAL_DIGITS: usize = 8;
  const MAX_INTERNATIONAL_DIGITS: usize = 15;

  /// Parses user input.
  ///
  /// A bare 10-digit national number is prefixed with `default_country_code`
  /// (for example `+91`); numbers starting with `+` are kept as international.
  pub fn parse(raw: &str, default_country_code: &str) -> Result<Self, ValidationError> {
    let raw = raw.trim();

    if !PHONE_INPUT.is_match(raw) {
      return Err(ValidationError::InvalidPhoneNumber);
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if raw.starts_with('+') {
      if !(Self::MIN_INTERNATIONAL_DIGITS..=Self::MAX_INTERNATIONAL_DIGITS).contains(&digits.len())
      {
        return Err(ValidationError::InvalidPhoneNumber);
      }
      return Ok(Self(format!("+{}", digits)));
    }

    if digits.len() == Self::NATIONAL_DIGITS {
      return Ok(Self(format!("{}{}", default_country_code, digits)));
    }

    Err(ValidationError::InvalidPhoneNumber)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for PhoneNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Replaces all but the last four characters with `X`
pub fn mask_phone_number(phone: &str) -> String {
  let len = phone.chars().count();
  if len < 4 {
    return phone.to_string();
  }

  let visible: String = phone.chars().skip(len - 4).collect();
  format!("{}{}", "X".repeat(len - 4), visible)
}

// ============================================================================
// Display name and locality
// ============================================================================

fn bounded_text(
  value: impl Into<String>,
  field: &'static str,
  max: usize,
) -> Result<String, ValidationError> {
  let value = value.into().trim().to_string();

  if value.is_empty() {
    return Err(ValidationError::FieldEmpty { field });
  }

  if value.chars().count() > max {
    return Err(ValidationError::FieldTooLong { field, max });
  }

  Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
  const MAX_LENGTH: usize = 255;

  pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
    bounded_text(name, "name", Self::MAX_LENGTH).map(Self)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

/// State or city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality(String);

impl Locality {
  const MAX_LENGTH: usize = 100;

  pub fn state(value: impl Into<String>) -> Result<Self, ValidationError> {
    bounded_text(value, "state", Self::MAX_LENGTH).map(Self)
  }

  pub fn city(value: impl Into<String>) -> Result<Self, ValidationError> {
    bounded_text(value, "city", Self::MAX_LENGTH).map(Self)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}
