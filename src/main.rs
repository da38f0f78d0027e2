use actix_web::{App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loanbook::{
  adapters::http::{RequestIdMiddleware, RouteDependencies, configure_routes},
  application::admin::{DeleteUserUseCase, ListUsersUseCase},
  application::audit::ViewAuditLogUseCase,
  application::auth::{
    ActivateAccountUseCase, GetProfileUseCase, LoginUserUseCase, LogoutUserUseCase,
    RefreshTokensUseCase, RegisterUserUseCase, RequestPasswordResetUseCase,
    ResendVerificationEmailUseCase, UpdatePasswordUseCase,
  },
  application::loan::{
    CreateLoanUseCase, DeleteLoanUseCase, ListLoansUseCase, UpdateLoanStatusUseCase,
    ViewLoanUseCase,
  },
  domain::auth::{AccountService, AuthService, UserLocks},
  domain::clock::Clock,
  infrastructure::{
    clock::SystemClock,
    config::Config,
    mail::LogMailer,
    persistence::memory::{
      InMemoryAuditLogRepository, InMemoryLoanRepository, InMemoryUserRepository,
    },
    security::{Argon2PasswordHasher, JwtTokenService, SecureTokenGenerator},
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "loanbook=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting loanbook");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!(?config, "Configuration loaded");

  if config.security.access_token_secret.is_empty()
    || config.security.refresh_token_secret.is_empty()
  {
    tracing::warn!("Token secrets are not configured; login and refresh will fail");
  }

  // Repositories
  let user_repo = Arc::new(InMemoryUserRepository::new());
  let loan_repo = Arc::new(InMemoryLoanRepository::new());
  let audit_repo = Arc::new(InMemoryAuditLogRepository::new());

  // Security services
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let password_hasher =
    Arc::new(Argon2PasswordHasher::new().context("Failed to create password hasher")?);
  let token_generator = Arc::new(SecureTokenGenerator::new());
  let token_service = Arc::new(JwtTokenService::new(
    &config.security.access_token_secret,
    &config.security.refresh_token_secret,
    config.security.access_token_ttl(),
    config.security.refresh_token_ttl(),
    clock.clone(),
  ));
  let mailer = Arc::new(LogMailer::new(config.server.base_url.clone()));
  let user_locks = Arc::new(UserLocks::new());

  // Domain services
  let auth_service = Arc::new(AuthService::new(
    user_repo.clone(),
    password_hasher.clone(),
    token_service,
    clock.clone(),
    user_locks.clone(),
  ));
  let account_service = Arc::new(
    AccountService::new(
      user_repo.clone(),
      password_hasher,
      token_generator,
      mailer,
      clock.clone(),
      user_locks.clone(),
    )
    .with_token_validity(
      config.security.activation_token_ttl(),
      config.security.reset_token_ttl(),
    ),
  );

  if let Some(admin) = &config.bootstrap_admin {
    let created = account_service
      .ensure_admin(&admin.username, &admin.email, &admin.password)
      .await
      .context("Failed to bootstrap admin account")?;
    if !created {
      tracing::info!(email = %admin.email, "Bootstrap admin already exists");
    }
  }

  let page_limits = config.pagination.limits();

  let deps = RouteDependencies {
    auth_service: auth_service.clone(),
    register: Arc::new(RegisterUserUseCase::new(account_service.clone())),
    login: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    refresh: Arc::new(RefreshTokensUseCase::new(auth_service.clone())),
    logout: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
    activate: Arc::new(ActivateAccountUseCase::new(account_service.clone())),
    resend_verification: Arc::new(ResendVerificationEmailUseCase::new(account_service.clone())),
    request_password_reset: Arc::new(RequestPasswordResetUseCase::new(account_service.clone())),
    update_password: Arc::new(UpdatePasswordUseCase::new(account_service)),
    get_profile: Arc::new(GetProfileUseCase::new(user_repo.clone())),
    create_loan: Arc::new(CreateLoanUseCase::new(
      loan_repo.clone(),
      audit_repo.clone(),
      clock.clone(),
    )),
    view_loan: Arc::new(ViewLoanUseCase::new(
      loan_repo.clone(),
      audit_repo.clone(),
      clock.clone(),
    )),
    list_loans: Arc::new(ListLoansUseCase::new(
      loan_repo.clone(),
      audit_repo.clone(),
      clock.clone(),
      page_limits,
    )),
    update_loan_status: Arc::new(UpdateLoanStatusUseCase::new(
      loan_repo.clone(),
      audit_repo.clone(),
      clock.clone(),
    )),
    delete_loan: Arc::new(DeleteLoanUseCase::new(
      loan_repo,
      audit_repo.clone(),
      clock.clone(),
    )),
    view_audit_log: Arc::new(ViewAuditLogUseCase::new(audit_repo, clock, page_limits)),
    list_users: Arc::new(ListUsersUseCase::new(user_repo.clone())),
    delete_user: Arc::new(DeleteUserUseCase::new(user_repo, user_locks)),
  };

  let bind_address = format!("{}:{}", config.server.host, config.server.port);
  tracing::info!("Listening on {}", bind_address);

  HttpServer::new(move || {
    let deps = deps.clone();
    App::new()
      .wrap(RequestIdMiddleware::new())
      .configure(move |cfg| configure_routes(cfg, deps))
  })
  .bind(&bind_address)
  .with_context(|| format!("Failed to bind {}", bind_address))?
  .run()
  .await
  .context("HTTP server error")
}
