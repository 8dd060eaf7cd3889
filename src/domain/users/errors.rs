use thiserror::Error;

/// Main profile error type
#[derive(Debug, Error)]
pub enum UserError {
  #[error("User not found")]
  NotFound,

  #[error("A profile already exists for this subject id")]
  SubjectAlreadyExists,

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Corrupt row: {0}")]
  CorruptRow(String),
}

/// Input validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Subject id must not be empty")]
  SubjectIdEmpty,

  #[error("Subject id must be at most {max} characters without whitespace")]
  SubjectIdInvalid { max: usize },

  #[error("Phone number must be 10 digits or an international number with 8 to 15 digits")]
  InvalidPhoneNumber,

  #[error("Field '{field}' must not be empty")]
  FieldEmpty { field: &'static str },

  #[error("Field '{field}' must be at most {max} characters")]
  FieldTooLong { field: &'static str, max: usize },

  #[error("Invalid role '{0}', expected one of lawyer, student, citizen")]
  InvalidRole(String),
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for UserError {
  fn from(error: sqlx::Error) -> Self {
    match RepositoryError::from(error) {
      RepositoryError::NotFound => UserError::NotFound,
      RepositoryError::DuplicateKey(_) => UserError::SubjectAlreadyExists,
      other => UserError::Repository(other),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_row_not_found_maps_to_not_found() {
    let error: UserError = sqlx::Error::RowNotFound.into();
    assert!(matches!(error, UserError::NotFound));
  }

  #[test]
  fn test_pool_errors_map_to_connection_failed() {
    let error: RepositoryError = sqlx::Error::PoolTimedOut.into();
    assert!(matches!(error, RepositoryError::ConnectionFailed(_)));

    let error: UserError = sqlx::Error::PoolClosed.into();
    assert!(matches!(
      error,
      UserError::Repository(RepositoryError::ConnectionFailed(_))
    ));
  }
}
