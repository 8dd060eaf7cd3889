//! Identity use cases
//!
//! Sign-up, confirmation, sign-in and sign-out through the identity
//! provider, the social login round trip, and completing a profile after
//! a social sign-in.

mod complete_profile;
mod confirm_sign_up;
mod sign_in;
mod sign_out;
mod sign_up;
mod social_callback;
mod social_login;

pub use complete_profile::{CompleteProfileCommand, CompleteProfileUseCase};
pub use confirm_sign_up::{ConfirmSignUpCommand, ConfirmSignUpUseCase};
pub use sign_in::{SignInCommand, SignInResponse, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpCommand, SignUpResponse, SignUpUseCase};
pub use social_callback::{SocialCallbackCommand, SocialCallbackOutcome, SocialCallbackUseCase};
pub use social_login::{SocialLoginResponse, SocialLoginUseCase};
