use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use std::sync::Arc;

use super::{BaseUrl, OAUTH_STATE_COOKIE, expired_cookie, session_cookie};
use crate::adapters::http::errors::ApiError;
use crate::application::identity::{
  SocialCallbackCommand, SocialCallbackOutcome, SocialCallbackUseCase, SocialLoginUseCase,
};

/// How long a hosted UI round trip may take
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct SocialLoginQuery {
  #[serde(default)]
  pub provider: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SocialCallbackQuery {
  #[serde(default)]
  pub code: Option<String>,
  #[serde(default)]
  pub state: Option<String>,
  #[serde(default)]
  pub error: Option<String>,
}

/// Starts a hosted UI sign-in
///
/// GET /api/auth/social-login?provider=Google
pub async fn social_login_handler(
  query: web::Query<SocialLoginQuery>,
  use_case: web::Data<Arc<SocialLoginUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let provider = query.provider.as_deref().unwrap_or("Google");
  let response = use_case.execute(provider)?;

  let state_cookie = Cookie::build(OAUTH_STATE_COOKIE, response.state)
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .max_age(Duration::minutes(OAUTH_STATE_TTL_MINUTES))
    .finish();

  Ok(
    HttpResponse::Found()
      .cookie(state_cookie)
      .insert_header(("Location", response.authorization_url))
      .finish(),
  )
}

/// OAuth callback handler - receives the authorization code from the hosted UI
///
/// GET /api/auth/social-callback?code&state
///
/// Always answers with a redirect: home without a code, `?error=auth_failed`
/// on any failure, otherwise chat or profile completion with a session cookie.
pub async fn social_callback_handler(
  req: HttpRequest,
  query: Option<web::Query<SocialCallbackQuery>>,
  use_case: web::Data<Arc<SocialCallbackUseCase>>,
  base_url: web::Data<BaseUrl>,
) -> HttpResponse {
  let query = query.map(web::Query::into_inner).unwrap_or_default();
  let expected_state = req
    .cookie(OAUTH_STATE_COOKIE)
    .map(|c| c.value().to_string());

  let outcome = use_case
    .execute(SocialCallbackCommand {
      code: query.code,
      state: query.state,
      error: query.error,
      expected_state,
    })
    .await;

  let mut response = HttpResponse::Found();
  response
    .cookie(expired_cookie(OAUTH_STATE_COOKIE))
    .insert_header(("Location", outcome.location(base_url.as_str())));

  if let SocialCallbackOutcome::SignedIn {
    access_token,
    expires_in_seconds,
    ..
  } = outcome
  {
    response.cookie(session_cookie(access_token, expires_in_seconds));
  }

  response.finish()
}
