use actix_web::web;
use std::sync::Arc;

use crate::application::admin::{DeleteUserUseCase, ListUsersUseCase};
use crate::application::audit::ViewAuditLogUseCase;
use crate::application::auth::{
  ActivateAccountUseCase, GetProfileUseCase, LoginUserUseCase, LogoutUserUseCase,
  RefreshTokensUseCase, RegisterUserUseCase, RequestPasswordResetUseCase,
  ResendVerificationEmailUseCase, UpdatePasswordUseCase,
};
use crate::application::loan::{
  CreateLoanUseCase, DeleteLoanUseCase, ListLoansUseCase, UpdateLoanStatusUseCase,
  ViewLoanUseCase,
};
use crate::domain::auth::services::AuthService;

use super::errors::ApiError;
use super::handlers::{admin, audit, auth, loans};
use super::middleware::AuthMiddleware;

/// Everything the HTTP boundary needs, built once at start-up
#[derive(Clone)]
pub struct RouteDependencies {
  pub auth_service: Arc<AuthService>,
  pub register: Arc<RegisterUserUseCase>,
  pub login: Arc<LoginUserUseCase>,
  pub refresh: Arc<RefreshTokensUseCase>,
  pub logout: Arc<LogoutUserUseCase>,
  pub activate: Arc<ActivateAccountUseCase>,
  pub resend_verification: Arc<ResendVerificationEmailUseCase>,
  pub request_password_reset: Arc<RequestPasswordResetUseCase>,
  pub update_password: Arc<UpdatePasswordUseCase>,
  pub get_profile: Arc<GetProfileUseCase>,
  pub create_loan: Arc<CreateLoanUseCase>,
  pub view_loan: Arc<ViewLoanUseCase>,
  pub list_loans: Arc<ListLoansUseCase>,
  pub update_loan_status: Arc<UpdateLoanStatusUseCase>,
  pub delete_loan: Arc<DeleteLoanUseCase>,
  pub view_audit_log: Arc<ViewAuditLogUseCase>,
  pub list_users: Arc<ListUsersUseCase>,
  pub delete_user: Arc<DeleteUserUseCase>,
}

/// Mounts every route
///
/// # Routes
///
/// Public:
/// - POST /users/register, /users/login, /users/refresh (alias /users/refresh-token)
/// - GET /users/verify-email/{token}/{email}, POST /users/verify-email
/// - POST /users/password-reset, /users/password-update
///
/// Bearer token required:
/// - GET /users/profile, POST /users/logout
/// - POST /loans, GET /loans/{id}
/// - GET /admin/loans, PATCH /admin/loans/{id}/status, DELETE /admin/loans/{id}
/// - GET /admin/logs
/// - GET /admin/users, DELETE /admin/users/{id}
pub fn configure_routes(cfg: &mut web::ServiceConfig, deps: RouteDependencies) {
  let auth_service = deps.auth_service.clone();

  cfg
    .app_data(
      web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
      web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(web::Data::new(deps.register))
    .app_data(web::Data::new(deps.login))
    .app_data(web::Data::new(deps.refresh))
    .app_data(web::Data::new(deps.logout))
    .app_data(web::Data::new(deps.activate))
    .app_data(web::Data::new(deps.resend_verification))
    .app_data(web::Data::new(deps.request_password_reset))
    .app_data(web::Data::new(deps.update_password))
    .app_data(web::Data::new(deps.get_profile))
    .app_data(web::Data::new(deps.create_loan))
    .app_data(web::Data::new(deps.view_loan))
    .app_data(web::Data::new(deps.list_loans))
    .app_data(web::Data::new(deps.update_loan_status))
    .app_data(web::Data::new(deps.delete_loan))
    .app_data(web::Data::new(deps.view_audit_log))
    .app_data(web::Data::new(deps.list_users))
    .app_data(web::Data::new(deps.delete_user));

  cfg.service(
    web::scope("/users")
      .route("/register", web::post().to(auth::register_handler))
      .route("/login", web::post().to(auth::login_handler))
      .route("/refresh", web::post().to(auth::refresh_handler))
      .route("/refresh-token", web::post().to(auth::refresh_handler))
      .route(
        "/verify-email/{token}/{email}",
        web::get().to(auth::activate_account_handler),
      )
      .route(
        "/verify-email",
        web::post().to(auth::resend_verification_handler),
      )
      .route(
        "/password-reset",
        web::post().to(auth::password_reset_handler),
      )
      .route(
        "/password-update",
        web::post().to(auth::password_update_handler),
      )
      .service(
        web::resource("/profile")
          .wrap(AuthMiddleware::new(auth_service.clone()))
          .route(web::get().to(auth::profile_handler)),
      )
      .service(
        web::resource("/logout")
          .wrap(AuthMiddleware::new(auth_service.clone()))
          .route(web::post().to(auth::logout_handler)),
      ),
  );

  cfg.service(
    web::scope("/loans")
      .wrap(AuthMiddleware::new(auth_service.clone()))
      .route("", web::post().to(loans::create_loan_handler))
      .route("/{id}", web::get().to(loans::view_loan_handler)),
  );

  cfg.service(
    web::scope("/admin")
      .wrap(AuthMiddleware::new(auth_service))
      .route("/loans", web::get().to(loans::list_loans_handler))
      .route(
        "/loans/{id}/status",
        web::patch().to(loans::update_loan_status_handler),
      )
      .route("/loans/{id}", web::delete().to(loans::delete_loan_handler))
      .route("/logs", web::get().to(audit::view_logs_handler))
      .route("/users", web::get().to(admin::list_users_handler))
      .route("/users/{id}", web::delete().to(admin::delete_user_handler)),
  );
}
