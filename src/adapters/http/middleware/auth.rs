use actix_web::{
  Error, HttpMessage, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::adapters::http::errors::ApiError;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::Actor;

/// Bearer-token middleware
///
/// Verifies the access token statelessly through [`AuthService::authenticate`]
/// and stores the resulting [`Actor`] in request extensions. Missing or bad
/// tokens are answered with the matching 401 body without reaching the
/// handler.
pub struct AuthMiddleware {
  auth_service: Arc<AuthService>,
}

impl AuthMiddleware {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      auth_service: self.auth_service.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  auth_service: Arc<AuthService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
    let service = Rc::clone(&self.service);
    let auth_service = self.auth_service.clone();

    Box::pin(async move {
      let authenticated = extract_bearer_token(&req)
        .ok_or(AuthError::InvalidToken)
        .and_then(|token| auth_service.authenticate(token));

      let actor = match authenticated {
        Ok(actor) => actor,
        Err(e) => {
          tracing::warn!(path = %req.path(), error = %e, "Rejected bearer token");
          let response = ApiError::from(e).error_response().map_into_right_body();
          let (request, _) = req.into_parts();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(actor);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

fn extract_bearer_token(req: &ServiceRequest) -> Option<&str> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|s| !s.is_empty())
}

/// Extension trait to extract the authenticated actor from a request
pub trait AuthUser {
  /// Fails with `invalid_token` when the route is not behind [`AuthMiddleware`]
  fn actor(&self) -> Result<Actor, ApiError>;
}

impl AuthUser for actix_web::HttpRequest {
  fn actor(&self) -> Result<Actor, ApiError> {
    self
      .extensions()
      .get::<Actor>()
      .cloned()
      .ok_or_else(|| ApiError::from(AuthError::InvalidToken))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn test_extract_bearer_token() {
    let req = TestRequest::default()
      .insert_header(("Authorization", "Bearer abc.def.ghi"))
      .to_srv_request();
    assert_eq!(extract_bearer_token(&req), Some("abc.def.ghi"));
  }

  #[test]
  fn test_extract_bearer_token_missing_or_malformed() {
    let req = TestRequest::default().to_srv_request();
    assert!(extract_bearer_token(&req).is_none());

    let req = TestRequest::default()
      .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
      .to_srv_request();
    assert!(extract_bearer_token(&req).is_none());

    let req = TestRequest::default()
      .insert_header(("Authorization", "Bearer "))
      .to_srv_request();
    assert!(extract_bearer_token(&req).is_none());
  }
}
