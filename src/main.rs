use actix_files as fs;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use digilaw::{
  adapters::http::{
    BaseUrl, RequestIdMiddleware, TemplateEngine, UserRouteDependencies, WebRouteDependencies,
    configure_social_auth_routes, configure_user_routes, configure_web_routes,
  },
  application::identity::{
    CompleteProfileUseCase, ConfirmSignUpUseCase, SignInUseCase, SignOutUseCase, SignUpUseCase,
    SocialCallbackUseCase, SocialLoginUseCase,
  },
  application::users::{
    CreateProfileUseCase, GetProfileUseCase, UpdateProfileUseCase, VerifyEmailUseCase,
    VerifyPhoneUseCase,
  },
  domain::identity::{IdentityProvider, IdentityService},
  domain::users::UserService,
  infrastructure::{
    config::{Config, IdentityProviderKind},
    identity::{CognitoIdentityProvider, CognitoSettings, SimulatedIdentityProvider},
    persistence::postgres::PostgresUserRepository,
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "digilaw=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Digilaw application");

  // Load configuration
  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    anyhow::anyhow!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Could not connect to database")?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  // Initialize repositories and domain services
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let user_service = Arc::new(UserService::new(user_repo));

  let identity_provider = build_identity_provider(&config)?;
  let identity_service = Arc::new(IdentityService::new(
    identity_provider,
    user_service.clone(),
    config.identity.settings(),
  ));

  let country_code = config.identity.default_country_code.clone();

  // Initialize profile use cases
  let user_routes = UserRouteDependencies {
    create_profile: Arc::new(CreateProfileUseCase::new(
      user_service.clone(),
      country_code.clone(),
    )),
    get_profile: Arc::new(GetProfileUseCase::new(user_service.clone())),
    update_profile: Arc::new(UpdateProfileUseCase::new(
      user_service.clone(),
      country_code.clone(),
    )),
    verify_phone: Arc::new(VerifyPhoneUseCase::new(user_service.clone())),
    verify_email: Arc::new(VerifyEmailUseCase::new(user_service.clone())),
  };

  // Initialize identity use cases
  let social_login_use_case = Arc::new(SocialLoginUseCase::new(identity_service.clone()));
  let social_callback_use_case = Arc::new(SocialCallbackUseCase::new(identity_service.clone()));

  // Initialize template engine
  let templates = TemplateEngine::new().context("Failed to initialize template engine")?;
  tracing::info!("Template engine initialized");

  let web_routes = WebRouteDependencies {
    templates,
    identity_service: identity_service.clone(),
    rate_limit: config.rate_limit.clone(),
    sign_up: Arc::new(SignUpUseCase::new(identity_service.clone())),
    confirm_sign_up: Arc::new(ConfirmSignUpUseCase::new(identity_service.clone())),
    sign_in: Arc::new(SignInUseCase::new(identity_service.clone())),
    sign_out: Arc::new(SignOutUseCase::new(identity_service.clone())),
    complete_profile: Arc::new(CompleteProfileUseCase::new(
      user_service.clone(),
      country_code,
    )),
    get_profile: user_routes.get_profile.clone(),
    update_profile: user_routes.update_profile.clone(),
  };

  let base_url = BaseUrl(config.server.base_url.clone());
  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      .app_data(web::Data::new(base_url.clone()))
      // Configure web UI routes
      .configure(|cfg| configure_web_routes(cfg, web_routes.clone()))
      // Configure profile API routes
      .service(
        web::scope("/api/users").configure(|cfg| configure_user_routes(cfg, user_routes.clone())),
      )
      // Configure social login routes
      .service(web::scope("/api/auth").configure(|cfg| {
        configure_social_auth_routes(
          cfg,
          social_login_use_case.clone(),
          social_callback_use_case.clone(),
        )
      }))
      // Static files
      .service(fs::Files::new("/static", "./static"))
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await?;

  Ok(())
}

/// Pick the identity provider named in the configuration
fn build_identity_provider(config: &Config) -> anyhow::Result<Arc<dyn IdentityProvider>> {
  match config.identity.provider {
    IdentityProviderKind::Simulated => {
      tracing::warn!("Using simulated identity provider; do not run this in production");
      Ok(Arc::new(SimulatedIdentityProvider::new(
        config.server.base_url.clone(),
      )))
    }
    IdentityProviderKind::Cognito => {
      let cognito = config
        .identity
        .cognito
        .as_ref()
        .context("identity.cognito section is required for the cognito provider")?;

      let settings = CognitoSettings {
        region: cognito.region.clone(),
        user_pool_id: cognito.user_pool_id.clone(),
        client_id: cognito.client_id.clone(),
        hosted_ui_domain: cognito.hosted_ui_domain.clone(),
        redirect_url: format!(
          "{}/api/auth/social-callback",
          config.server.base_url.trim_end_matches('/')
        ),
        request_timeout_seconds: cognito.request_timeout_seconds,
      };

      let provider =
        CognitoIdentityProvider::new(settings).context("Failed to create Cognito client")?;
      Ok(Arc::new(provider))
    }
  }
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
