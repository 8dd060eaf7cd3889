use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CreateProfileRequest, UpdateProfileRequest, UserResponse},
  errors::ApiError,
};
use crate::application::users::{
  CreateProfileUseCase, GetProfileUseCase, UpdateProfileUseCase, VerifyEmailUseCase,
  VerifyPhoneUseCase,
};

/// Handler for profile creation
///
/// POST /api/users/profile
/// Body: CreateProfileRequest (JSON)
/// Response: UserResponse (JSON) with status 201
pub async fn create_profile_handler(
  request: web::Json<CreateProfileRequest>,
  use_case: web::Data<Arc<CreateProfileUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let user = use_case.execute(request.into_inner().into()).await?;

  Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Handler for fetching a profile
///
/// GET /api/users/profile/{sub}
pub async fn get_profile_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<GetProfileUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = use_case.execute(&path).await?;

  Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Handler for partial profile updates
///
/// PATCH /api/users/profile/{sub}
/// Body: UpdateProfileRequest (JSON), any subset of the profile fields
pub async fn update_profile_handler(
  path: web::Path<String>,
  request: web::Json<UpdateProfileRequest>,
  use_case: web::Data<Arc<UpdateProfileUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let user = use_case
    .execute(&path, request.into_inner().into())
    .await?;

  Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /api/users/verify-phone/{sub}
pub async fn verify_phone_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<VerifyPhoneUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = use_case.execute(&path).await?;

  Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /api/users/verify-email/{sub}
pub async fn verify_email_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<VerifyEmailUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = use_case.execute(&path).await?;

  Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
  use actix_web::{App, http::StatusCode, test, web};
  use serde_json::json;
  use std::sync::Arc;

  use crate::adapters::http::dtos::UserResponse;
  use crate::adapters::http::routes::{UserRouteDependencies, configure_user_routes};
  use crate::application::users::*;
  use crate::domain::users::{UserRole, UserService};
  use crate::test_support::InMemoryUserRepository;

  fn dependencies() -> UserRouteDependencies {
    let user_service = Arc::new(UserService::new(Arc::new(
      InMemoryUserRepository::default(),
    )));

    UserRouteDependencies {
      create_profile: Arc::new(CreateProfileUseCase::new(user_service.clone(), "+91")),
      get_profile: Arc::new(GetProfileUseCase::new(user_service.clone())),
      update_profile: Arc::new(UpdateProfileUseCase::new(user_service.clone(), "+91")),
      verify_phone: Arc::new(VerifyPhoneUseCase::new(user_service.clone())),
      verify_email: Arc::new(VerifyEmailUseCase::new(user_service)),
    }
  }

  fn profile_body(sub: &str) -> serde_json::Value {
    json!({
      "cognitoSub": sub,
      "email": "meera@example.com",
      "name": "Meera Iyer",
      "phoneNumber": "9988776655",
      "state": "Tamil Nadu",
      "city": "Chennai",
      "role": "student"
    })
  }

  macro_rules! app {
    () => {
      test::init_service(App::new().service(
        web::scope("/api/users").configure(|cfg| configure_user_routes(cfg, dependencies())),
      ))
      .await
    };
  }

  #[actix_web::test]
  async fn test_create_then_fetch_returns_same_data() {
    let app = app!();

    let req = test::TestRequest::post()
      .uri("/api/users/profile")
      .set_json(profile_body("sub-1"))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: UserResponse = test::read_body_json(resp).await;

    assert_eq!(created.phone_number, "+919988776655");
    assert_eq!(created.role, UserRole::Student);
    assert!(!created.phone_verified);

    let req = test::TestRequest::get()
      .uri("/api/users/profile/sub-1")
      .to_request();
    let fetched: UserResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.cognito_sub, "sub-1");
    assert_eq!(fetched.email, created.email);
    assert_eq!(fetched.city, "Chennai");
  }

  #[actix_web::test]
  async fn test_duplicate_create_conflicts() {
    let app = app!();

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
      let req = test::TestRequest::post()
        .uri("/api/users/profile")
        .set_json(profile_body("sub-1"))
        .to_request();
      let resp = test::call_service(&app, req).await;
      assert_eq!(resp.status(), expected);
    }
  }

  #[actix_web::test]
  async fn test_create_with_invalid_fields() {
    let app = app!();

    let mut body = profile_body("sub-1");
    body["email"] = json!("nope");
    let req = test::TestRequest::post()
      .uri("/api/users/profile")
      .set_json(body)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut body = profile_body("sub-1");
    body["role"] = json!("judge");
    let req = test::TestRequest::post()
      .uri("/api/users/profile")
      .set_json(body)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[actix_web::test]
  async fn test_update_merges_fields() {
    let app = app!();
    let req = test::TestRequest::post()
      .uri("/api/users/profile")
      .set_json(profile_body("sub-1"))
      .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::patch()
      .uri("/api/users/profile/sub-1")
      .set_json(json!({ "city": "Madurai", "role": "LAWYER" }))
      .to_request();
    let updated: UserResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated.city, "Madurai");
    assert_eq!(updated.role, UserRole::Lawyer);
    assert_eq!(updated.name, "Meera Iyer");
    assert_eq!(updated.state, "Tamil Nadu");
  }

  #[actix_web::test]
  async fn test_verify_phone_flips_flag() {
    let app = app!();
    let req = test::TestRequest::post()
      .uri("/api/users/profile")
      .set_json(profile_body("sub-1"))
      .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::patch()
      .uri("/api/users/verify-phone/sub-1")
      .to_request();
    let verified: UserResponse = test::call_and_read_body_json(&app, req).await;
    assert!(verified.phone_verified);
    assert!(!verified.email_verified);

    let req = test::TestRequest::patch()
      .uri("/api/users/verify-email/sub-1")
      .to_request();
    let verified: UserResponse = test::call_and_read_body_json(&app, req).await;
    assert!(verified.phone_verified);
    assert!(verified.email_verified);
  }

  #[actix_web::test]
  async fn test_unknown_subject_is_404() {
    let app = app!();

    let requests = [
      test::TestRequest::get().uri("/api/users/profile/ghost"),
      test::TestRequest::patch()
        .uri("/api/users/profile/ghost")
        .set_json(json!({ "city": "Pune" })),
      test::TestRequest::patch().uri("/api/users/verify-phone/ghost"),
      test::TestRequest::patch().uri("/api/users/verify-email/ghost"),
    ];

    for req in requests {
      let resp = test::call_service(&app, req.to_request()).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
  }

  #[actix_web::test]
  async fn test_malformed_subject_is_404() {
    let app = app!();
    let too_long = "a".repeat(129);

    for sub in ["has%20space", too_long.as_str()] {
      let requests = [
        test::TestRequest::get().uri(&format!("/api/users/profile/{}", sub)),
        test::TestRequest::patch()
          .uri(&format!("/api/users/profile/{}", sub))
          .set_json(json!({ "city": "Pune" })),
        test::TestRequest::patch().uri(&format!("/api/users/verify-phone/{}", sub)),
        test::TestRequest::patch().uri(&format!("/api/users/verify-email/{}", sub)),
      ];

      for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", sub);
      }
    }
  }
}
