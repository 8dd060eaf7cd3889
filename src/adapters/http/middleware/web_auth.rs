use actix_web::{
  Error, HttpMessage, HttpResponse,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{future::ready, rc::Rc, sync::Arc};

use crate::adapters::http::handlers::ACCESS_TOKEN_COOKIE;
use crate::domain::identity::IdentityService;

/// Web authentication middleware using the access token cookie.
///
/// The token is resolved through the identity provider and the resulting
/// `IdentityClaims` are stored in request extensions. Requests without a
/// valid session are redirected to the login page.
pub struct WebAuthMiddleware {
  identity_service: Arc<IdentityService>,
}

impl WebAuthMiddleware {
  pub fn new(identity_service: Arc<IdentityService>) -> Self {
    Self { identity_service }
  }
}

impl<S, B> Transform<S, ServiceRequest> for WebAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type InitError = ();
  type Transform = WebAuthMiddlewareService<S>;
  type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(WebAuthMiddlewareService {
      service: Rc::new(service),
      identity_service: self.identity_service.clone(),
    }))
  }
}

pub struct WebAuthMiddlewareService<S> {
  service: Rc<S>,
  identity_service: Arc<IdentityService>,
}

impl<S, B> Service<ServiceRequest> for WebAuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let token = req
      .cookie(ACCESS_TOKEN_COOKIE)
      .map(|c| c.value().to_string())
      .filter(|token| !token.is_empty());

    let identity_service = self.identity_service.clone();
    let service = Rc::clone(&self.service);

    Box::pin(async move {
      let claims = match token {
        Some(token) => match identity_service.resolve_session(&token).await {
          Ok(claims) => Some(claims),
          Err(e) => {
            tracing::debug!(error = %e, path = %req.path(), "Rejected web session");
            None
          }
        },
        None => None,
      };

      match claims {
        Some(claims) => {
          req.extensions_mut().insert(claims);
          let res = service.call(req).await?;
          Ok(res.map_into_left_body())
        }
        None => {
          let res = req.into_response(
            HttpResponse::Found()
              .insert_header(("Location", "/login"))
              .finish(),
          );
          Ok(res.map_into_right_body())
        }
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{App, HttpRequest, cookie::Cookie, http::StatusCode, test, web};

  use crate::domain::identity::{IdentityClaims, IdentitySettings};
  use crate::domain::users::UserService;
  use crate::infrastructure::identity::SimulatedIdentityProvider;
  use crate::test_support::InMemoryUserRepository;

  async fn whoami(req: HttpRequest) -> HttpResponse {
    let subject = req
      .extensions()
      .get::<IdentityClaims>()
      .map(|c| c.subject_id.clone())
      .unwrap_or_default();
    HttpResponse::Ok().body(subject)
  }

  #[actix_web::test]
  async fn test_web_auth_middleware() {
    let identity_service = Arc::new(IdentityService::new(
      Arc::new(SimulatedIdentityProvider::new("http://localhost:8080")),
      Arc::new(UserService::new(Arc::new(
        InMemoryUserRepository::default(),
      ))),
      IdentitySettings::default(),
    ));
    let code = SimulatedIdentityProvider::encode_code(&IdentityClaims {
      subject_id: "sub-9".to_string(),
      ..Default::default()
    });
    let tokens = identity_service
      .complete_social_login(&code)
      .await
      .unwrap()
      .tokens;

    let app = test::init_service(
      App::new().service(
        web::scope("/chat")
          .wrap(WebAuthMiddleware::new(identity_service))
          .route("", web::get().to(whoami)),
      ),
    )
    .await;

    // No cookie
    let resp = test::call_service(&app, test::TestRequest::get().uri("/chat").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get("Location").unwrap(), "/login");

    // Unknown token
    let req = test::TestRequest::get()
      .uri("/chat")
      .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "stale"))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    // Valid session
    let req = test::TestRequest::get()
      .uri("/chat")
      .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, tokens.access_token))
      .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "sub-9");
  }
}
