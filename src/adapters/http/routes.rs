use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::web;
use std::sync::Arc;

use crate::application::identity::{
  CompleteProfileUseCase, ConfirmSignUpUseCase, SignInUseCase, SignOutUseCase, SignUpUseCase,
  SocialCallbackUseCase, SocialLoginUseCase,
};
use crate::application::users::{
  CreateProfileUseCase, GetProfileUseCase, UpdateProfileUseCase, VerifyEmailUseCase,
  VerifyPhoneUseCase,
};
use crate::domain::identity::IdentityService;
use crate::infrastructure::config::RateLimitConfig;

use super::handlers::social_auth::{social_callback_handler, social_login_handler};
use super::handlers::users::{
  create_profile_handler, get_profile_handler, update_profile_handler, verify_email_handler,
  verify_phone_handler,
};
use super::handlers::{pages, web_auth};
use super::middleware::WebAuthMiddleware;
use super::templates::TemplateEngine;

/// Use cases behind the profile API
#[derive(Clone)]
pub struct UserRouteDependencies {
  pub create_profile: Arc<CreateProfileUseCase>,
  pub get_profile: Arc<GetProfileUseCase>,
  pub update_profile: Arc<UpdateProfileUseCase>,
  pub verify_phone: Arc<VerifyPhoneUseCase>,
  pub verify_email: Arc<VerifyEmailUseCase>,
}

/// Configure profile routes
///
/// Mounts the profile endpoints under the provided scope
/// (e.g. /api/users).
///
/// # Routes
///
/// - POST /profile - Create a profile
/// - GET /profile/{sub} - Fetch a profile by subject id
/// - PATCH /profile/{sub} - Merge changes into a profile
/// - PATCH /verify-phone/{sub} - Mark the phone number verified
/// - PATCH /verify-email/{sub} - Mark the email verified
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// # use digilaw::adapters::http::routes::{UserRouteDependencies, configure_user_routes};
///
/// # fn example(dependencies: UserRouteDependencies) {
/// let app = App::new().service(
///   web::scope("/api/users").configure(|cfg| configure_user_routes(cfg, dependencies)),
/// );
/// # }
/// ```
pub fn configure_user_routes(cfg: &mut web::ServiceConfig, dependencies: UserRouteDependencies) {
  cfg
    .app_data(web::Data::new(dependencies.create_profile))
    .app_data(web::Data::new(dependencies.get_profile))
    .app_data(web::Data::new(dependencies.update_profile))
    .app_data(web::Data::new(dependencies.verify_phone))
    .app_data(web::Data::new(dependencies.verify_email))
    .route("/profile", web::post().to(create_profile_handler))
    .route("/profile/{sub}", web::get().to(get_profile_handler))
    .route("/profile/{sub}", web::patch().to(update_profile_handler))
    .route("/verify-phone/{sub}", web::patch().to(verify_phone_handler))
    .route("/verify-email/{sub}", web::patch().to(verify_email_handler));
}

/// Configure social login routes (e.g. under /api/auth)
///
/// - GET /social-login?provider=Google - Redirect to the hosted UI
/// - GET /social-callback?code&state - Hosted UI callback
///
/// Expects a `BaseUrl` in app data.
pub fn configure_social_auth_routes(
  cfg: &mut web::ServiceConfig,
  social_login_use_case: Arc<SocialLoginUseCase>,
  social_callback_use_case: Arc<SocialCallbackUseCase>,
) {
  cfg
    .app_data(web::Data::new(social_login_use_case))
    .app_data(web::Data::new(social_callback_use_case))
    .route("/social-login", web::get().to(social_login_handler))
    .route("/social-callback", web::get().to(social_callback_handler));
}

/// Everything the server-rendered pages need
#[derive(Clone)]
pub struct WebRouteDependencies {
  pub templates: TemplateEngine,
  pub identity_service: Arc<IdentityService>,
  pub rate_limit: RateLimitConfig,
  pub sign_up: Arc<SignUpUseCase>,
  pub confirm_sign_up: Arc<ConfirmSignUpUseCase>,
  pub sign_in: Arc<SignInUseCase>,
  pub sign_out: Arc<SignOutUseCase>,
  pub complete_profile: Arc<CompleteProfileUseCase>,
  pub get_profile: Arc<GetProfileUseCase>,
  pub update_profile: Arc<UpdateProfileUseCase>,
}

/// Configure web UI routes
pub fn configure_web_routes(cfg: &mut web::ServiceConfig, dependencies: WebRouteDependencies) {
  let WebRouteDependencies {
    templates,
    identity_service,
    rate_limit,
    sign_up,
    confirm_sign_up,
    sign_in,
    sign_out,
    complete_profile,
    get_profile,
    update_profile,
  } = dependencies;

  // Add template engine to app data
  cfg.app_data(web::Data::new(templates));

  // Public routes (no authentication required)
  cfg
    .route("/", web::get().to(pages::root_redirect))
    .route("/login", web::get().to(pages::login_page))
    .route("/signup", web::get().to(pages::signup_page))
    .route("/confirm", web::get().to(pages::confirm_page));

  // Zero values would disable the limiter; clamp them so the builder accepts the config
  let governor_conf = GovernorConfigBuilder::default()
    .per_second(rate_limit.auth_per_second.max(1))
    .burst_size(rate_limit.auth_burst_size.max(1))
    .finish()
    .unwrap_or_default();

  // Auth form submission routes, rate limited per client IP
  cfg.service(
    web::scope("/auth")
      .wrap(Governor::new(&governor_conf))
      .app_data(web::Data::new(sign_up))
      .app_data(web::Data::new(confirm_sign_up))
      .app_data(web::Data::new(sign_in))
      .app_data(web::Data::new(sign_out))
      .route("/signup", web::post().to(web_auth::signup_submit))
      .route("/confirm", web::post().to(web_auth::confirm_submit))
      .route("/login", web::post().to(web_auth::login_submit))
      .route("/logout", web::post().to(web_auth::logout))
      .service(
        web::resource("/complete-profile")
          .wrap(WebAuthMiddleware::new(identity_service.clone()))
          .app_data(web::Data::new(complete_profile))
          .route(web::get().to(pages::complete_profile_page))
          .route(web::post().to(web_auth::complete_profile_submit)),
      ),
  );

  // Protected routes (require authentication)
  cfg.service(
    web::resource("/profile")
      .wrap(WebAuthMiddleware::new(identity_service.clone()))
      .app_data(web::Data::new(get_profile))
      .app_data(web::Data::new(update_profile))
      .route(web::get().to(pages::profile_page))
      .route(web::post().to(web_auth::profile_submit)),
  );

  cfg.service(
    web::resource("/chat")
      .wrap(WebAuthMiddleware::new(identity_service))
      .route(web::get().to(pages::chat_page)),
  );
}
