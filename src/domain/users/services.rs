use std::sync::Arc;

use super::entities::{NewProfile, ProfileUpdate, User};
use super::errors::UserError;
use super::ports::UserRepository;
use super::value_objects::SubjectId;

/// Profile service implementing the CRUD contract
pub struct UserService {
  user_repo: Arc<dyn UserRepository>,
}

impl UserService {
  pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
    Self { user_repo }
  }

  /// Persists a new profile; relies on the unique constraint for duplicates
  pub async fn create_profile(&self, profile: NewProfile) -> Result<User, UserError> {
    let user = User::new(profile);
    let created = self.user_repo.create(user).await?;

    tracing::info!(
      user_id = %created.id,
      role = %created.role,
      "Created profile"
    );

    Ok(created)
  }

  /// Returns the profile for `subject_id` or `UserError::NotFound`
  pub async fn get_profile(&self, subject_id: &SubjectId) -> Result<User, UserError> {
    self
      .user_repo
      .find_by_subject_id(subject_id)
      .await?
      .ok_or(UserError::NotFound)
  }

  /// Like `get_profile` but without the not-found error
  pub async fn find_profile(&self, subject_id: &SubjectId) -> Result<Option<User>, UserError> {
    self.user_repo.find_by_subject_id(subject_id).await
  }

  pub async fn update_profile(
    &self,
    subject_id: &SubjectId,
    update: ProfileUpdate,
  ) -> Result<User, UserError> {
    let mut user = self.get_profile(subject_id).await?;

    if update.is_empty() {
      return Ok(user);
    }

    user.apply_update(update);
    self.user_repo.update(user).await
  }

  pub async fn verify_phone(&self, subject_id: &SubjectId) -> Result<User, UserError> {
    let mut user = self.get_profile(subject_id).await?;

    if !user.verify_phone() {
      return Ok(user);
    }

    tracing::info!(user_id = %user.id, "Phone number verified");
    self.user_repo.update(user).await
  }

  pub async fn verify_email(&self, subject_id: &SubjectId) -> Result<User, UserError> {
    let mut user = self.get_profile(subject_id).await?;

    if !user.verify_email() {
      return Ok(user);
    }

    tracing::info!(user_id = %user.id, "Email verified");
    self.user_repo.update(user).await
  }

  /// Raises verification flags reported by the identity provider.
  /// Flags only ever go from false to true.
  pub async fn sync_verification(
    &self,
    mut user: User,
    phone_verified: bool,
    email_verified: bool,
  ) -> Result<User, UserError> {
    let phone_changed = phone_verified && user.verify_phone();
    let email_changed = email_verified && user.verify_email();

    if !phone_changed && !email_changed {
      return Ok(user);
    }

    tracing::info!(
      user_id = %user.id,
      phone_changed,
      email_changed,
      "Synced verification flags from identity provider"
    );
    self.user_repo.update(user).await
  }
}
