pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;

// Re-export commonly used types
pub use dtos::{CreateProfileRequest, ErrorResponse, UpdateProfileRequest, UserResponse};
pub use errors::{ApiError, AuthErrorKind};
pub use handlers::BaseUrl;
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware, WebAuthMiddleware};
pub use routes::{
  UserRouteDependencies, WebRouteDependencies, configure_social_auth_routes,
  configure_user_routes, configure_web_routes,
};
pub use templates::TemplateEngine;
