use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::identity::IdentityError;
use crate::domain::users::{RepositoryError, UserError};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Missing resource (404 Not Found)
  NotFound(String),

  /// Resource already exists (409 Conflict)
  Conflict(String),

  /// Authentication error (401 Unauthorized or 403 Forbidden)
  Auth(AuthErrorKind),

  /// Identity provider failure (502 Bad Gateway)
  BadGateway(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Serialize)]
pub enum AuthErrorKind {
  /// Invalid credentials (401)
  InvalidCredentials,

  /// Session expired or invalid (401)
  InvalidSession,

  /// Wrong or expired confirmation code (400)
  InvalidCode,

  /// Account exists but is unconfirmed (403)
  NotConfirmed,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::BadGateway(msg) => write!(f, "Identity provider error: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidSession => StatusCode::UNAUTHORIZED,
        AuthErrorKind::InvalidCode => StatusCode::BAD_REQUEST,
        AuthErrorKind::NotConfirmed => StatusCode::FORBIDDEN,
      },
      ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict(msg) => ("conflict", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => (
          "invalid_credentials",
          "Invalid phone number, email or password".to_string(),
        ),
        AuthErrorKind::InvalidSession => {
          ("invalid_session", "Invalid or expired session".to_string())
        }
        AuthErrorKind::InvalidCode => (
          "invalid_code",
          "Invalid or expired confirmation code".to_string(),
        ),
        AuthErrorKind::NotConfirmed => (
          "not_confirmed",
          "Account has not been confirmed yet".to_string(),
        ),
      },
      ApiError::BadGateway(msg) => {
        tracing::error!("Identity provider error: {}", msg);
        (
          "identity_provider_error",
          "The identity provider could not complete the request".to_string(),
        )
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details in production
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert UserError to ApiError
impl From<UserError> for ApiError {
  fn from(error: UserError) -> Self {
    match error {
      UserError::NotFound => ApiError::NotFound("User not found".to_string()),
      UserError::SubjectAlreadyExists => {
        ApiError::Conflict("A profile for this subject already exists".to_string())
      }
      UserError::Validation(err) => ApiError::Validation(err.to_string()),
      UserError::Repository(err) => match err {
        RepositoryError::NotFound => ApiError::NotFound("User not found".to_string()),
        RepositoryError::DuplicateKey(_) => {
          ApiError::Conflict("A profile for this subject already exists".to_string())
        }
        _ => ApiError::Internal(err.to_string()),
      },
    }
  }
}

/// Convert IdentityError to ApiError
impl From<IdentityError> for ApiError {
  fn from(error: IdentityError) -> Self {
    match error {
      IdentityError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      IdentityError::InvalidSession | IdentityError::StateMismatch => {
        ApiError::Auth(AuthErrorKind::InvalidSession)
      }
      IdentityError::InvalidCode => ApiError::Auth(AuthErrorKind::InvalidCode),
      IdentityError::NotConfirmed => ApiError::Auth(AuthErrorKind::NotConfirmed),
      IdentityError::UsernameExists => ApiError::Conflict(error.to_string()),
      IdentityError::PasswordMismatch
      | IdentityError::InvalidPassword { .. }
      | IdentityError::InvalidLogin
      | IdentityError::Validation(_) => ApiError::Validation(error.to_string()),
      IdentityError::CodeExchange(msg) | IdentityError::Provider(msg) => ApiError::BadGateway(msg),
      IdentityError::NotConfigured(msg) => ApiError::Internal(msg),
      IdentityError::User(err) => ApiError::from(err),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::users::ValidationError;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::NotFound("test".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Conflict("test".to_string()).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidSession).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::BadGateway("test".to_string()).status_code(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_user_error_conversion() {
    let api_error: ApiError = UserError::NotFound.into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = UserError::SubjectAlreadyExists.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = UserError::Validation(ValidationError::InvalidPhoneNumber).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError =
      UserError::Repository(RepositoryError::ConnectionFailed("down".to_string())).into();
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn test_identity_error_conversion() {
    let api_error: ApiError = IdentityError::InvalidCredentials.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = IdentityError::UsernameExists.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = IdentityError::Provider("timeout".to_string()).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_GATEWAY);

    let api_error: ApiError = IdentityError::User(UserError::NotFound).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn test_internal_error_body_hides_details() {
    let response = ApiError::Internal("connection refused".to_string()).error_response();
    let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"], "internal_error");
    assert!(!json["message"].as_str().unwrap().contains("connection refused"));
  }
}
