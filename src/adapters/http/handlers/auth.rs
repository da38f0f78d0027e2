use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use super::device_fingerprint;
use crate::adapters::http::{
  dtos::{
    EmailRequest, LoginRequest, LogoutRequest, LogoutResponse, PasswordUpdateRequest,
    RefreshRequest, RegisterRequest, RegisterResponse, SuccessResponse, TokensResponse,
  },
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::auth::{
  ActivateAccountCommand, ActivateAccountUseCase, GetProfileUseCase, LoginUserCommand,
  LoginUserUseCase, LogoutUserCommand, LogoutUserUseCase, RefreshTokensCommand,
  RefreshTokensUseCase, RegisterUserCommand, RegisterUserUseCase, RequestPasswordResetCommand,
  RequestPasswordResetUseCase, ResendVerificationEmailCommand, ResendVerificationEmailUseCase,
  UpdatePasswordCommand, UpdatePasswordUseCase,
};

/// POST /users/register
///
/// Response: 201 with the new user's id; the account stays inactive until
/// the emailed activation link is followed.
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let request = request.into_inner();

  let response = use_case
    .execute(RegisterUserCommand {
      username: request.username,
      email: request.email,
      password: request.password,
      name: request.name,
      bio: request.bio,
    })
    .await?;

  Ok(HttpResponse::Created().json(RegisterResponse {
    user_id: response.user_id,
    username: response.username,
    email: response.email,
    message: "Registered successfully. Please check your email for account activation."
      .to_string(),
  }))
}

/// POST /users/login
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let request = request.into_inner();
  let device = device_fingerprint(&http_req);

  let response = use_case
    .execute(
      LoginUserCommand {
        email: request.email,
        password: request.password,
      },
      device,
    )
    .await?;

  Ok(HttpResponse::Ok().json(TokensResponse {
    tokens: response.tokens,
  }))
}

/// POST /users/refresh
///
/// Body: `{"user_id": ..., "token": <refresh token>}`. Only the device that
/// received the refresh token can redeem it.
pub async fn refresh_handler(
  request: web::Json<RefreshRequest>,
  use_case: web::Data<Arc<RefreshTokensUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let request = request.into_inner();
  let device = device_fingerprint(&http_req);

  let response = use_case
    .execute(
      RefreshTokensCommand {
        user_id: request.user_id,
        refresh_token: request.token,
      },
      device,
    )
    .await?;

  Ok(HttpResponse::Ok().json(TokensResponse {
    tokens: response.tokens,
  }))
}

/// POST /users/logout
///
/// An empty body logs out the calling device; `{"all_devices": true}`
/// revokes every session of the account.
pub async fn logout_handler(
  request: Option<web::Json<LogoutRequest>>,
  use_case: web::Data<Arc<LogoutUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;
  let device = device_fingerprint(&http_req);
  let request = request.map(web::Json::into_inner).unwrap_or_default();

  let response = use_case
    .execute(
      &actor,
      &device,
      LogoutUserCommand {
        all_devices: request.all_devices,
      },
    )
    .await?;

  Ok(HttpResponse::Ok().json(LogoutResponse {
    revoked_sessions: response.revoked_sessions,
    message: "Logged out".to_string(),
  }))
}

/// GET /users/verify-email/{token}/{email}
pub async fn activate_account_handler(
  path: web::Path<(String, String)>,
  use_case: web::Data<Arc<ActivateAccountUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let (token, email) = path.into_inner();

  use_case
    .execute(ActivateAccountCommand { token, email })
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse::new("Account activated successfully")))
}

/// POST /users/verify-email
pub async fn resend_verification_handler(
  request: web::Json<EmailRequest>,
  use_case: web::Data<Arc<ResendVerificationEmailUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(ResendVerificationEmailCommand {
      email: request.into_inner().email,
    })
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse::new(
    "Verification email sent. Please check your email",
  )))
}

/// POST /users/password-reset
pub async fn password_reset_handler(
  request: web::Json<EmailRequest>,
  use_case: web::Data<Arc<RequestPasswordResetUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(RequestPasswordResetCommand {
      email: request.into_inner().email,
    })
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse::new(
    "Successfully sent password reset link to your email",
  )))
}

/// POST /users/password-update
pub async fn password_update_handler(
  request: web::Json<PasswordUpdateRequest>,
  use_case: web::Data<Arc<UpdatePasswordUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let request = request.into_inner();

  use_case
    .execute(UpdatePasswordCommand {
      email: request.email,
      password: request.password,
      token: request.token,
    })
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse::new("Password has been reset")))
}

/// GET /users/profile
pub async fn profile_handler(
  use_case: web::Data<Arc<GetProfileUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;
  let profile = use_case.execute(&actor).await?;

  Ok(HttpResponse::Ok().json(profile))
}
