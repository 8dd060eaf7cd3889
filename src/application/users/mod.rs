//! Profile use cases
//!
//! One use case per operation of the profile API. Commands carry the raw
//! strings received over HTTP; parsing into value objects happens here.

mod create_profile;
mod get_profile;
mod update_profile;
mod verify_email;
mod verify_phone;

pub use create_profile::{CreateProfileCommand, CreateProfileUseCase};
pub use get_profile::GetProfileUseCase;
pub use update_profile::{UpdateProfileCommand, UpdateProfileUseCase};
pub use verify_email::VerifyEmailUseCase;
pub use verify_phone::VerifyPhoneUseCase;

use crate::domain::users::{SubjectId, UserError};

/// Parses a subject id taken from a lookup path. No profile can be stored
/// under an id that does not parse, so the lookup is simply not found.
pub(crate) fn lookup_subject_id(subject_id: &str) -> Result<SubjectId, UserError> {
  SubjectId::new(subject_id).map_err(|e| {
    tracing::debug!(error = %e, "Rejected subject id in profile lookup");
    UserError::NotFound
  })
}
