use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::users::{CreateProfileCommand, UpdateProfileCommand};
use crate::domain::users::{User, UserRole};

/// Request for creating a profile
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
  /// Identity-provider subject id
  #[validate(length(min = 1, max = 128, message = "cognitoSub is required"))]
  pub cognito_sub: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(
    min = 1,
    max = 255,
    message = "Name must be between 1 and 255 characters"
  ))]
  pub name: String,

  #[validate(length(min = 1, message = "Phone number is required"))]
  pub phone_number: String,

  #[validate(length(
    min = 1,
    max = 100,
    message = "State must be between 1 and 100 characters"
  ))]
  pub state: String,

  #[validate(length(
    min = 1,
    max = 100,
    message = "City must be between 1 and 100 characters"
  ))]
  pub city: String,

  /// lawyer, student or citizen; citizen when omitted
  #[serde(default)]
  pub role: Option<String>,
}

impl From<CreateProfileRequest> for CreateProfileCommand {
  fn from(request: CreateProfileRequest) -> Self {
    Self {
      subject_id: request.cognito_sub,
      email: request.email,
      name: request.name,
      phone_number: request.phone_number,
      state: request.state,
      city: request.city,
      role: request.role,
    }
  }
}

/// Partial profile update; omitted fields stay as they are
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,

  #[validate(length(
    min = 1,
    max = 255,
    message = "Name must be between 1 and 255 characters"
  ))]
  pub name: Option<String>,

  #[validate(length(min = 1, message = "Phone number must not be empty"))]
  pub phone_number: Option<String>,

  #[validate(length(
    min = 1,
    max = 100,
    message = "State must be between 1 and 100 characters"
  ))]
  pub state: Option<String>,

  #[validate(length(
    min = 1,
    max = 100,
    message = "City must be between 1 and 100 characters"
  ))]
  pub city: Option<String>,

  pub role: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileCommand {
  fn from(request: UpdateProfileRequest) -> Self {
    Self {
      email: request.email,
      name: request.name,
      phone_number: request.phone_number,
      state: request.state,
      city: request.city,
      role: request.role,
    }
  }
}

/// Profile as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
  pub id: Uuid,
  pub cognito_sub: String,
  pub email: String,
  pub name: String,
  pub phone_number: String,
  pub state: String,
  pub city: String,
  pub role: UserRole,
  pub phone_verified: bool,
  pub email_verified: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      cognito_sub: user.subject_id,
      email: user.email,
      name: user.name,
      phone_number: user.phone_number,
      state: user.state,
      city: user.city,
      role: user.role,
      phone_verified: user.phone_verified,
      email_verified: user.email_verified,
      created_at: user.created_at,
      updated_at: user.updated_at,
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
