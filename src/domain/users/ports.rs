use async_trait::async_trait;

use super::entities::User;
use super::errors::UserError;
use super::value_objects::SubjectId;

/// Repository trait for profile persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Inserts a new profile. Fails with `SubjectAlreadyExists` on a duplicate subject id.
  async fn create(&self, user: User) -> Result<User, UserError>;

  /// Finds a profile by identity-provider subject id
  async fn find_by_subject_id(&self, subject_id: &SubjectId) -> Result<Option<User>, UserError>;

  /// Persists every mutable field of an existing profile
  async fn update(&self, user: User) -> Result<User, UserError>;
}
