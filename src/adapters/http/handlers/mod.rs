pub mod pages;
pub mod social_auth;
pub mod users;
pub mod web_auth;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpMessage, HttpRequest};

use crate::adapters::http::errors::{ApiError, AuthErrorKind};
use crate::domain::identity::IdentityClaims;

/// Cookie holding the identity provider access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie holding the state of a pending hosted UI sign-in
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Public URL of the web UI, used to build absolute redirects
#[derive(Debug, Clone)]
pub struct BaseUrl(pub String);

impl BaseUrl {
  pub fn as_str(&self) -> &str {
    self.0.trim_end_matches('/')
  }
}

/// Extract the signed-in user's claims from request extensions
pub fn get_claims(req: &HttpRequest) -> Result<IdentityClaims, ApiError> {
  let claims = req.extensions().get::<IdentityClaims>().cloned();

  if claims.is_none() {
    tracing::warn!(
      "get_claims: identity claims not found in request extensions for path {}",
      req.path()
    );
  }

  claims.ok_or(ApiError::Auth(AuthErrorKind::InvalidSession))
}

/// Session cookie carrying the access token
pub fn session_cookie(access_token: String, expires_in_seconds: u64) -> Cookie<'static> {
  let max_age = i64::try_from(expires_in_seconds).unwrap_or(i64::MAX);

  Cookie::build(ACCESS_TOKEN_COOKIE, access_token)
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .max_age(Duration::seconds(max_age))
    .finish()
}

/// Cookie that makes the browser drop `name`
pub fn expired_cookie(name: &'static str) -> Cookie<'static> {
  Cookie::build(name, "")
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .max_age(Duration::seconds(0))
    .finish()
}
