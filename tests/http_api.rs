use actix_web::{App, http::StatusCode, test};
use chrono::Duration;
use serde_json::{Value, json};
use std::sync::Arc;

use loanbook::adapters::http::{RequestIdMiddleware, RouteDependencies, configure_routes};
use loanbook::application::admin::{DeleteUserUseCase, ListUsersUseCase};
use loanbook::application::audit::ViewAuditLogUseCase;
use loanbook::application::auth::{
  ActivateAccountUseCase, GetProfileUseCase, LoginUserUseCase, LogoutUserUseCase,
  RefreshTokensUseCase, RegisterUserUseCase, RequestPasswordResetUseCase,
  ResendVerificationEmailUseCase, UpdatePasswordUseCase,
};
use loanbook::application::loan::{
  CreateLoanUseCase, DeleteLoanUseCase, ListLoansUseCase, UpdateLoanStatusUseCase,
  ViewLoanUseCase,
};
use loanbook::domain::auth::{AccountService, AuthService, UserLocks};
use loanbook::domain::clock::Clock;
use loanbook::domain::pagination::PageLimits;
use loanbook::infrastructure::clock::SystemClock;
use loanbook::infrastructure::mail::{OutboxMailer, SentMailKind};
use loanbook::infrastructure::persistence::memory::{
  InMemoryAuditLogRepository, InMemoryLoanRepository, InMemoryUserRepository,
};
use loanbook::infrastructure::security::{
  Argon2PasswordHasher, JwtTokenService, SecureTokenGenerator,
};

const PASSWORD: &str = "Secret123!";
const USER_AGENT: &str = "loanbook-tests/1.0";

fn build() -> (RouteDependencies, Arc<OutboxMailer>, Arc<AccountService>) {
  let users = Arc::new(InMemoryUserRepository::new());
  let loans = Arc::new(InMemoryLoanRepository::new());
  let audit = Arc::new(InMemoryAuditLogRepository::new());
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let hasher = Arc::new(Argon2PasswordHasher::new().unwrap());
  let mailer = Arc::new(OutboxMailer::new());
  let locks = Arc::new(UserLocks::new());
  let tokens = Arc::new(JwtTokenService::new(
    "access-secret",
    "refresh-secret",
    Duration::hours(1),
    Duration::days(7),
    clock.clone(),
  ));

  let auth = Arc::new(AuthService::new(
    users.clone(),
    hasher.clone(),
    tokens,
    clock.clone(),
    locks.clone(),
  ));
  let accounts = Arc::new(AccountService::new(
    users.clone(),
    hasher,
    Arc::new(SecureTokenGenerator::new()),
    mailer.clone(),
    clock.clone(),
    locks.clone(),
  ));
  let limits = PageLimits::default();

  let deps = RouteDependencies {
    auth_service: auth.clone(),
    register: Arc::new(RegisterUserUseCase::new(accounts.clone())),
    login: Arc::new(LoginUserUseCase::new(auth.clone())),
    refresh: Arc::new(RefreshTokensUseCase::new(auth.clone())),
    logout: Arc::new(LogoutUserUseCase::new(auth)),
    activate: Arc::new(ActivateAccountUseCase::new(accounts.clone())),
    resend_verification: Arc::new(ResendVerificationEmailUseCase::new(accounts.clone())),
    request_password_reset: Arc::new(RequestPasswordResetUseCase::new(accounts.clone())),
    update_password: Arc::new(UpdatePasswordUseCase::new(accounts.clone())),
    get_profile: Arc::new(GetProfileUseCase::new(users.clone())),
    create_loan: Arc::new(CreateLoanUseCase::new(loans.clone(), audit.clone(), clock.clone())),
    view_loan: Arc::new(ViewLoanUseCase::new(loans.clone(), audit.clone(), clock.clone())),
    list_loans: Arc::new(ListLoansUseCase::new(
      loans.clone(),
      audit.clone(),
      clock.clone(),
      limits,
    )),
    update_loan_status: Arc::new(UpdateLoanStatusUseCase::new(
      loans.clone(),
      audit.clone(),
      clock.clone(),
    )),
    delete_loan: Arc::new(DeleteLoanUseCase::new(loans, audit.clone(), clock.clone())),
    view_audit_log: Arc::new(ViewAuditLogUseCase::new(audit, clock, limits)),
    list_users: Arc::new(ListUsersUseCase::new(users.clone())),
    delete_user: Arc::new(DeleteUserUseCase::new(users, locks)),
  };

  (deps, mailer, accounts)
}

macro_rules! app {
  ($deps:expr) => {{
    let deps = $deps.clone();
    test::init_service(
      App::new()
        .wrap(RequestIdMiddleware::new())
        .configure(move |cfg| configure_routes(cfg, deps)),
    )
    .await
  }};
}

macro_rules! send {
  ($app:expr, $req:expr) => {{
    let response = test::call_service(&$app, $req.to_request()).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
  }};
}

fn bearer(token: &str) -> (&'static str, String) {
  ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_borrower_journey() {
  let (deps, mailer, _) = build();
  let app = app!(deps);

  let (status, body) = send!(
    app,
    test::TestRequest::post()
      .uri("/users/register")
      .set_json(json!({"username": "alice", "email": "alice@x.com", "password": PASSWORD}))
  );
  assert_eq!(status, StatusCode::CREATED);
  let user_id = body["user_id"].as_str().unwrap().to_string();

  let (status, body) = send!(
    app,
    test::TestRequest::post()
      .uri("/users/login")
      .insert_header(("User-Agent", USER_AGENT))
      .set_json(json!({"email": "alice@x.com", "password": PASSWORD}))
  );
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "account_not_activated");

  let token = mailer
    .last_token(SentMailKind::Activation, "alice@x.com")
    .await
    .unwrap();
  let (status, _) = send!(
    app,
    test::TestRequest::get().uri(&format!("/users/verify-email/{}/alice@x.com", token))
  );
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send!(
    app,
    test::TestRequest::post()
      .uri("/users/login")
      .insert_header(("User-Agent", USER_AGENT))
      .set_json(json!({"email": "alice@x.com", "password": PASSWORD}))
  );
  assert_eq!(status, StatusCode::OK);
  let access = body["tokens"]["accessToken"].as_str().unwrap().to_string();
  let refresh = body["tokens"]["refreshToken"].as_str().unwrap().to_string();

  let (status, body) = send!(
    app,
    test::TestRequest::get()
      .uri("/users/profile")
      .insert_header(bearer(&access))
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["email"], "alice@x.com");
  assert!(body.get("password_hash").is_none());

  let (status, body) = send!(
    app,
    test::TestRequest::post()
      .uri("/loans")
      .insert_header(bearer(&access))
      .set_json(json!({"amount": "2500.00", "interest_rate": "4.5", "term": 12}))
  );
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["loan"]["status"], "pending");
  let loan_id = body["loan"]["id"].as_str().unwrap().to_string();

  let (status, body) = send!(
    app,
    test::TestRequest::get()
      .uri(&format!("/loans/{}", loan_id))
      .insert_header(bearer(&access))
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["loan"]["user_id"], user_id);

  let (status, body) = send!(
    app,
    test::TestRequest::get()
      .uri("/admin/loans")
      .insert_header(bearer(&access))
  );
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["error"], "forbidden");

  let (status, body) = send!(
    app,
    test::TestRequest::post()
      .uri("/users/refresh")
      .insert_header(("User-Agent", USER_AGENT))
      .set_json(json!({"user_id": user_id, "refresh_token": refresh}))
  );
  assert_eq!(status, StatusCode::OK);
  assert!(body["tokens"]["accessToken"].is_string());

  let (status, body) = send!(
    app,
    test::TestRequest::post()
      .uri("/users/refresh")
      .insert_header(("User-Agent", USER_AGENT))
      .set_json(json!({"user_id": user_id, "refresh_token": refresh}))
  );
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "invalid_token");
}

#[actix_web::test]
async fn test_protected_routes_require_bearer_token() {
  let (deps, _, _) = build();
  let app = app!(deps);

  let (status, body) = send!(app, test::TestRequest::get().uri("/users/profile"));
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "invalid_token");

  let (status, body) = send!(
    app,
    test::TestRequest::get()
      .uri("/admin/logs")
      .insert_header(bearer("not.a.jwt"))
  );
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "invalid_token");
}

#[actix_web::test]
async fn test_admin_reviews_loans_and_logs() {
  let (deps, mailer, accounts) = build();
  accounts
    .ensure_admin("root", "root@x.com", PASSWORD)
    .await
    .unwrap();
  let app = app!(deps);

  send!(
    app,
    test::TestRequest::post()
      .uri("/users/register")
      .set_json(json!({"username": "bob", "email": "bob@x.com", "password": PASSWORD}))
  );
  let token = mailer
    .last_token(SentMailKind::Activation, "bob@x.com")
    .await
    .unwrap();
  send!(
    app,
    test::TestRequest::get().uri(&format!("/users/verify-email/{}/bob@x.com", token))
  );

  let mut access = Vec::new();
  for email in ["bob@x.com", "root@x.com"] {
    let (status, body) = send!(
      app,
      test::TestRequest::post()
        .uri("/users/login")
        .set_json(json!({"email": email, "password": PASSWORD}))
    );
    assert_eq!(status, StatusCode::OK);
    access.push(body["tokens"]["accessToken"].as_str().unwrap().to_string());
  }
  let (bob, root) = (&access[0], &access[1]);

  let (_, body) = send!(
    app,
    test::TestRequest::post()
      .uri("/loans")
      .insert_header(bearer(bob))
      .set_json(json!({"amount": 1000, "interest_rate": 3, "term_months": 6}))
  );
  let loan_id = body["loan"]["id"].as_str().unwrap().to_string();

  let (status, body) = send!(
    app,
    test::TestRequest::patch()
      .uri(&format!("/admin/loans/{}/status", loan_id))
      .insert_header(bearer(root))
      .set_json(json!({"status": "rejected"}))
  );
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "bad_request");

  let (status, body) = send!(
    app,
    test::TestRequest::patch()
      .uri(&format!("/admin/loans/{}/status", loan_id))
      .insert_header(bearer(root))
      .set_json(json!({"status": "approved"}))
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["loan"]["status"], "approved");

  let (status, body) = send!(
    app,
    test::TestRequest::get()
      .uri("/admin/loans?status=approved")
      .insert_header(bearer(root))
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total"], 1);

  let (status, body) = send!(
    app,
    test::TestRequest::get()
      .uri("/admin/logs?event=update_loan_status")
      .insert_header(bearer(root))
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total"], 1);
  assert_eq!(body["logs"][0]["event"], "update_loan_status");

  let (status, body) = send!(
    app,
    test::TestRequest::get()
      .uri("/admin/users")
      .insert_header(bearer(root))
  );
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["users"].as_array().unwrap().len(), 2);

  let (status, body) = send!(
    app,
    test::TestRequest::delete()
      .uri(&format!("/admin/loans/{}", loan_id))
      .insert_header(bearer(root))
  );
  assert_eq!(status, StatusCode::OK);
  assert!(body["message"].is_string());
}
