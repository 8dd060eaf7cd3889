pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{NewProfile, ProfileUpdate, User, UserRole};
pub use errors::{RepositoryError, UserError, ValidationError};
pub use ports::UserRepository;
pub use services::UserService;
pub use value_objects::{
  DisplayName, Email, Locality, PhoneNumber, SubjectId, mask_phone_number,
};
