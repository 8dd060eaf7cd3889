use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use serde::Deserialize;
use std::sync::Arc;

use super::get_claims;
use crate::adapters::http::errors::ApiError;
use crate::adapters::http::templates::{TemplateEngine, page_context};
use crate::application::users::GetProfileUseCase;
use crate::domain::identity::Destination;
use crate::domain::users::{UserError, mask_phone_number};

#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
  #[serde(default)]
  pub confirmed: Option<String>,
  #[serde(default)]
  pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmPageQuery {
  #[serde(default)]
  pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteProfilePageQuery {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
}

/// Landing page; forwards to login, keeping any query (e.g. `?error=auth_failed`)
pub async fn root_redirect(req: HttpRequest) -> HttpResponse {
  let location = match req.query_string() {
    "" => "/login".to_string(),
    query => format!("/login?{}", query),
  };

  HttpResponse::Found()
    .insert_header(("Location", location))
    .finish()
}

/// Render login page
pub async fn login_page(
  query: web::Query<LoginPageQuery>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let mut context = page_context("Sign in");

  if query.confirmed.is_some() {
    context.insert("notice", "Your account is confirmed. Sign in to continue.");
  }
  if query.error.as_deref() == Some("auth_failed") {
    context.insert("error", "Social sign-in failed. Please try again.");
  }

  templates.respond(StatusCode::OK, "pages/login.html.tera", &context)
}

/// Render sign-up page
pub async fn signup_page(
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let context = page_context("Create account");
  templates.respond(StatusCode::OK, "pages/signup.html.tera", &context)
}

/// Render the confirmation-code page
pub async fn confirm_page(
  query: web::Query<ConfirmPageQuery>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let mut context = page_context("Confirm account");
  context.insert("phone_number", query.phone.as_deref().unwrap_or_default());

  templates.respond(StatusCode::OK, "pages/confirm.html.tera", &context)
}

/// Render the complete-profile page (authenticated)
///
/// Name and email come from the query the sign-in redirect carried, falling
/// back to the identity claims.
pub async fn complete_profile_page(
  req: HttpRequest,
  query: web::Query<CompleteProfilePageQuery>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let claims = get_claims(&req)?;
  let query = query.into_inner();

  let mut context = page_context("Complete your profile");
  context.insert("name", &query.name.or(claims.name).unwrap_or_default());
  context.insert("email", &query.email.or(claims.email).unwrap_or_default());

  templates.respond(StatusCode::OK, "pages/complete_profile.html.tera", &context)
}

/// Render the profile page (authenticated)
pub async fn profile_page(
  req: HttpRequest,
  use_case: web::Data<Arc<GetProfileUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let claims = get_claims(&req)?;

  let user = match use_case.execute(&claims.subject_id).await {
    Ok(user) => user,
    Err(UserError::NotFound) => {
      let destination = Destination::CompleteProfile {
        name: claims.name,
        email: claims.email,
      };
      return Ok(
        HttpResponse::Found()
          .insert_header(("Location", destination.location("")))
          .finish(),
      );
    }
    Err(e) => return Err(ApiError::from(e).into()),
  };

  let mut context = page_context("Your profile");
  context.insert("masked_phone", &mask_phone_number(&user.phone_number));
  context.insert("user", &user);

  templates.respond(StatusCode::OK, "pages/profile.html.tera", &context)
}

/// Render chat landing page (authenticated)
pub async fn chat_page(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let claims = get_claims(&req)?;

  let mut context = page_context("Chat");
  context.insert("name", &claims.name.unwrap_or_default());

  templates.respond(StatusCode::OK, "pages/chat.html.tera", &context)
}
