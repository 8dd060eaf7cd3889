pub mod cognito;
pub mod simulated;

pub use cognito::{CognitoIdentityProvider, CognitoSettings};
pub use simulated::SimulatedIdentityProvider;
