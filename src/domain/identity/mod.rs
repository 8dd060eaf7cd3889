pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{AuthTokens, Destination, IdentityClaims, SignUpOutcome, SignUpRequest};
pub use errors::IdentityError;
pub use ports::IdentityProvider;
pub use services::{AuthenticatedUser, IdentityService, IdentitySettings, SignUpDetails};
pub use value_objects::{Password, SocialProvider, Username};
