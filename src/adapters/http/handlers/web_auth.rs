use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use serde::Deserialize;
use std::sync::Arc;

use super::{ACCESS_TOKEN_COOKIE, expired_cookie, get_claims, session_cookie};
use crate::adapters::http::middleware::RequestIdExt;
use crate::adapters::http::templates::{TemplateEngine, page_context};
use crate::application::identity::{
  CompleteProfileCommand, CompleteProfileUseCase, ConfirmSignUpCommand, ConfirmSignUpUseCase,
  SignInCommand, SignInUseCase, SignOutUseCase, SignUpCommand, SignUpUseCase,
};
use crate::application::users::{UpdateProfileCommand, UpdateProfileUseCase};
use crate::domain::identity::Destination;
use crate::domain::users::mask_phone_number;

#[derive(Debug, Deserialize)]
pub struct SignUpFormData {
  name: String,
  phone_number: String,
  state: String,
  city: String,
  #[serde(default)]
  role: Option<String>,
  password: String,
  confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmFormData {
  phone_number: String,
  code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginFormData {
  /// Email or phone number
  identifier: String,
  password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileFormData {
  email: String,
  name: String,
  phone_number: String,
  state: String,
  city: String,
  #[serde(default)]
  role: Option<String>,
}

/// HTMX redirect, answered with 200 so the client follows it
fn hx_redirect(location: &str) -> HttpResponse {
  HttpResponse::Ok()
    .insert_header(("HX-Redirect", location))
    .finish()
}

/// Handle sign-up form submission
pub async fn signup_submit(
  form: web::Form<SignUpFormData>,
  use_case: web::Data<Arc<SignUpUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let form = form.into_inner();
  let command = SignUpCommand {
    name: form.name.clone(),
    phone_number: form.phone_number.clone(),
    state: form.state.clone(),
    city: form.city.clone(),
    role: form.role.clone(),
    password: form.password,
    confirm_password: form.confirm_password,
  };

  match use_case.execute(command).await {
    Ok(response) => {
      let query = serde_urlencoded::to_string([("phone", response.phone_digits.as_str())])
        .map_err(actix_web::error::ErrorInternalServerError)?;
      Ok(hx_redirect(&format!("/confirm?{}", query)))
    }
    Err(e) => {
      let mut context = page_context("Create account");
      context.insert("error", &e.to_string());
      context.insert("name", &form.name);
      context.insert("phone_number", &form.phone_number);
      context.insert("state", &form.state);
      context.insert("city", &form.city);
      context.insert("role", &form.role.unwrap_or_default());

      templates.respond(
        StatusCode::BAD_REQUEST,
        "partials/signup_form.html.tera",
        &context,
      )
    }
  }
}

/// Handle confirmation-code form submission
pub async fn confirm_submit(
  form: web::Form<ConfirmFormData>,
  use_case: web::Data<Arc<ConfirmSignUpUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let form = form.into_inner();
  let command = ConfirmSignUpCommand {
    phone_number: form.phone_number.clone(),
    code: form.code,
  };

  match use_case.execute(command).await {
    Ok(()) => Ok(hx_redirect("/login?confirmed=1")),
    Err(e) => {
      let mut context = page_context("Confirm account");
      context.insert("error", &e.to_string());
      context.insert("phone_number", &form.phone_number);

      templates.respond(
        StatusCode::BAD_REQUEST,
        "partials/confirm_form.html.tera",
        &context,
      )
    }
  }
}

/// Handle login form submission
pub async fn login_submit(
  req: HttpRequest,
  form: web::Form<LoginFormData>,
  use_case: web::Data<Arc<SignInUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let form = form.into_inner();
  let command = SignInCommand {
    identifier: form.identifier.clone(),
    password: form.password,
  };

  match use_case.execute(command).await {
    Ok(response) => {
      tracing::info!(request_id = ?req.request_id(), "Login successful");

      let cookie = session_cookie(response.access_token, response.expires_in_seconds);
      Ok(
        HttpResponse::Ok()
          .cookie(cookie)
          .insert_header(("HX-Redirect", response.destination.location("")))
          .finish(),
      )
    }
    Err(e) => {
      let mut context = page_context("Sign in");
      context.insert("error", &e.to_string());
      context.insert("identifier", &form.identifier);

      templates.respond(
        StatusCode::BAD_REQUEST,
        "partials/login_form.html.tera",
        &context,
      )
    }
  }
}

/// Handle logout
///
/// The provider-side sign-out is best effort; the cookie is always cleared.
pub async fn logout(
  req: HttpRequest,
  use_case: web::Data<Arc<SignOutUseCase>>,
) -> Result<HttpResponse, actix_web::Error> {
  if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
    if let Err(e) = use_case.execute(cookie.value()).await {
      tracing::warn!(request_id = ?req.request_id(), error = %e, "Global sign-out failed");
    }
  }

  Ok(
    HttpResponse::Found()
      .cookie(expired_cookie(ACCESS_TOKEN_COOKIE))
      .insert_header(("Location", "/login"))
      .finish(),
  )
}

/// Handle complete-profile form submission (authenticated)
pub async fn complete_profile_submit(
  req: HttpRequest,
  form: web::Form<ProfileFormData>,
  use_case: web::Data<Arc<CompleteProfileUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let claims = get_claims(&req)?;
  let form = form.into_inner();
  let command = CompleteProfileCommand {
    email: form.email.clone(),
    name: form.name.clone(),
    phone_number: form.phone_number.clone(),
    state: form.state.clone(),
    city: form.city.clone(),
    role: form.role.clone(),
  };

  match use_case.execute(&claims, command).await {
    Ok(user) => {
      tracing::info!(user_id = %user.id, "Profile completed");
      Ok(hx_redirect(Destination::CHAT_PATH))
    }
    Err(e) => {
      let mut context = page_context("Complete your profile");
      context.insert("error", &e.to_string());
      context.insert("name", &form.name);
      context.insert("email", &form.email);
      context.insert("phone_number", &form.phone_number);
      context.insert("state", &form.state);
      context.insert("city", &form.city);
      context.insert("role", &form.role.unwrap_or_default());

      templates.respond(
        StatusCode::BAD_REQUEST,
        "partials/complete_profile_form.html.tera",
        &context,
      )
    }
  }
}

/// Handle profile form submission (authenticated)
pub async fn profile_submit(
  req: HttpRequest,
  form: web::Form<ProfileFormData>,
  use_case: web::Data<Arc<UpdateProfileUseCase>>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, actix_web::Error> {
  let claims = get_claims(&req)?;
  let form = form.into_inner();
  let command = UpdateProfileCommand {
    email: Some(form.email.clone()),
    name: Some(form.name.clone()),
    phone_number: Some(form.phone_number.clone()),
    state: Some(form.state.clone()),
    city: Some(form.city.clone()),
    role: form.role.clone().filter(|r| !r.trim().is_empty()),
  };

  let mut context = page_context("Your profile");
  let status = match use_case.execute(&claims.subject_id, command).await {
    Ok(user) => {
      context.insert("notice", "Profile saved.");
      context.insert("masked_phone", &mask_phone_number(&user.phone_number));
      context.insert("user", &user);
      StatusCode::OK
    }
    Err(e) => {
      context.insert("error", &e.to_string());
      context.insert("masked_phone", &mask_phone_number(&form.phone_number));
      context.insert("user", &form_values(&form));
      StatusCode::BAD_REQUEST
    }
  };

  templates.respond(status, "partials/profile_form.html.tera", &context)
}

/// Values to re-fill a profile form with after a failed submission
fn form_values(form: &ProfileFormData) -> serde_json::Value {
  serde_json::json!({
    "email": form.email,
    "name": form.name,
    "phone_number": form.phone_number,
    "state": form.state,
    "city": form.city,
    "role": form.role.as_deref().unwrap_or_default(),
  })
}
