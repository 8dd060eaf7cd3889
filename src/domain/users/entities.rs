use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::ValidationError;
use super::value_objects::{DisplayName, Email, Locality, PhoneNumber, SubjectId};

/// Kind of user, restricting what the application offers them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  Lawyer,
  Student,
  #[default]
  Citizen,
}

impl UserRole {
  pub const ALL: [UserRole; 3] = [UserRole::Lawyer, UserRole::Student, UserRole::Citizen];

  pub fn as_str(&self) -> &'static str {
    match self {
      UserRole::Lawyer => "lawyer",
      UserRole::Student => "student",
      UserRole::Citizen => "citizen",
    }
  }
}

impl FromStr for UserRole {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "lawyer" => Ok(UserRole::Lawyer),
      "student" => Ok(UserRole::Student),
      "citizen" => Ok(UserRole::Citizen),
      _ => Err(ValidationError::InvalidRole(s.to_string())),
    }
  }
}

impl fmt::Display for UserRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Validated input for creating a profile
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub subject_id: SubjectId,
  pub email: Email,
  pub name: DisplayName,
  pub phone_number: PhoneNumber,
  pub state: Locality,
  pub city: Locality,
  pub role: UserRole,
}

/// Validated partial update; `None` leaves the field as it is
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
  pub email: Option<Email>,
  pub name: Option<DisplayName>,
  pub phone_number: Option<PhoneNumber>,
  pub state: Option<Locality>,
  pub city: Option<Locality>,
  pub role: Option<UserRole>,
}

impl ProfileUpdate {
  pub fn is_empty(&self) -> bool {
    self.email.is_none()
      && self.name.is_none()
      && self.phone_number.is_none()
      && self.state.is_none()
      && self.city.is_none()
      && self.role.is_none()
  }
}

/// User profile keyed by the identity-provider subject id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  /// Identity-provider subject id (unique)
  pub subject_id: String,
  pub email: String,
  pub name: String,
  /// E.164 phone number
  pub phone_number: String,
  pub state: String,
  pub city: String,
  pub role: UserRole,
  pub phone_verified: bool,
  pub email_verified: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// Creates a new, unverified profile
  pub fn new(profile: NewProfile) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      subject_id: profile.subject_id.into_inner(),
      email: profile.email.into_inner(),
      name: profile.name.into_inner(),
      phone_number: profile.phone_number.into_inner(),
      state: profile.state.into_inner(),
      city: profile.city.into_inner(),
      role: profile.role,
      phone_verified: false,
      email_verified: false,
      created_at: now,
      updated_at: now,
    }
  }

  /// Creates a user from database fields (for reconstruction)
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: Uuid,
    subject_id: String,
    email: String,
    name: String,
    phone_number: String,
    state: String,
    city: String,
    role: UserRole,
    phone_verified: bool,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      subject_id,
      email,
      name,
      phone_number,
      state,
      city,
      role,
      phone_verified,
      email_verified,
      created_at,
      updated_at,
    }
  }

  /// Merges the supplied fields. Verification flags are left alone.
  pub fn apply_update(&mut self, update: ProfileUpdate) {
    if update.is_empty() {
      return;
    }

    if let Some(email) = update.email {
      self.email = email.into_inner();
    }
    if let Some(name) = update.name {
      self.name = name.into_inner();
    }
    if let Some(phone_number) = update.phone_number {
      self.phone_number = phone_number.into_inner();
    }
    if let Some(state) = update.state {
      self.state = state.into_inner();
    }
    if let Some(city) = update.city {
      self.city = city.into_inner();
    }
    if let Some(role) = update.role {
      self.role = role;
    }
    self.updated_at = Utc::now();
  }

  /// Marks the phone number as verified. Returns false if it already was.
  pub fn verify_phone(&mut self) -> bool {
    if self.phone_verified {
      return false;
    }
    self.phone_verified = true;
    self.updated_at = Utc::now();
    true
  }

  /// Marks the email as verified. Returns false if it already was.
  pub fn verify_email(&mut self) -> bool {
    if self.email_verified {
      return false;
    }
    self.email_verified = true;
    self.updated_at = Utc::now();
    true
  }

  pub fn has_phone_number(&self) -> bool {
    !self.phone_number.trim().is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_profile() -> NewProfile {
    NewProfile {
      subject_id: SubjectId::new("sub-123").unwrap(),
      email: Email::new("asha@example.com").unwrap(),
      name: DisplayName::new("Asha Rao").unwrap(),
      phone_number: PhoneNumber::parse("9876543210", "+91").unwrap(),
      state: Locality::state("Kerala").unwrap(),
      city: Locality::city("Kochi").unwrap(),
      role: UserRole::Lawyer,
    }
  }

  #[test]
  fn test_user_creation() {
    let user = User::new(new_profile());

    assert_eq!(user.subject_id, "sub-123");
    assert_eq!(user.phone_number, "+919876543210");
    assert_eq!(user.role, UserRole::Lawyer);
    assert!(!user.phone_verified);
    assert!(!user.email_verified);
    assert_eq!(user.created_at, user.updated_at);
  }

  #[test]
  fn test_apply_update_merges_only_supplied_fields() {
    let mut user = User::new(new_profile());

    user.apply_update(ProfileUpdate {
      city: Some(Locality::city("Thrissur").unwrap()),
      role: Some(UserRole::Student),
      ..Default::default()
    });

    assert_eq!(user.city, "Thrissur");
    assert_eq!(user.role, UserRole::Student);
    assert_eq!(user.name, "Asha Rao");
    assert_eq!(user.state, "Kerala");
    assert!(user.updated_at >= user.created_at);
  }

  #[test]
  fn test_update_does_not_reset_verification() {
    let mut user = User::new(new_profile());
    user.verify_phone();
    user.verify_email();

    user.apply_update(ProfileUpdate {
      phone_number: Some(PhoneNumber::parse("9123456789", "+91").unwrap()),
      email: Some(Email::new("new@example.com").unwrap()),
      ..Default::default()
    });

    assert!(user.phone_verified);
    assert!(user.email_verified);
  }

  #[test]
  fn test_verify_phone_is_idempotent() {
    let mut user = User::new(new_profile());

    assert!(user.verify_phone());
    assert!(!user.verify_phone());
    assert!(user.phone_verified);
    assert!(!user.email_verified);
  }

  #[test]
  fn test_role_parsing() {
    assert_eq!("Lawyer".parse::<UserRole>().unwrap(), UserRole::Lawyer);
    assert_eq!(" student ".parse::<UserRole>().unwrap(), UserRole::Student);
    assert_eq!(UserRole::default(), UserRole::Citizen);
    assert!("judge".parse::<UserRole>().is_err());
  }

  #[test]
  fn test_role_serializes_lowercase() {
    let json = serde_json::to_string(&UserRole::Citizen).unwrap();
    assert_eq!(json, "\"citizen\"");

    let role: UserRole = serde_json::from_str("\"lawyer\"").unwrap();
    assert_eq!(role, UserRole::Lawyer);
  }

  #[test]
  fn test_has_phone_number() {
    let mut user = User::new(new_profile());
    assert!(user.has_phone_number());

    user.phone_number = String::new();
    assert!(!user.has_phone_number());
  }
}
