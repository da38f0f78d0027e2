use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use super::request_cancellation;
use crate::adapters::http::{
  dtos::{
    CreateLoanRequest, LoanListQuery, LoanListResponse, LoanResponse, SuccessResponse,
    UpdateLoanStatusRequest,
  },
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::loan::{
  CreateLoanCommand, CreateLoanUseCase, DeleteLoanCommand, DeleteLoanUseCase, ListLoansCommand,
  ListLoansUseCase, UpdateLoanStatusCommand, UpdateLoanStatusUseCase, ViewLoanCommand,
  ViewLoanUseCase,
};

/// POST /loans
pub async fn create_loan_handler(
  request: web::Json<CreateLoanRequest>,
  use_case: web::Data<Arc<CreateLoanUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let actor = http_req.actor()?;
  let request = request.into_inner();
  let (cancel, _guard) = request_cancellation();

  let response = use_case
    .execute(
      &actor,
      CreateLoanCommand {
        amount: request.amount,
        interest_rate: request.interest_rate,
        term_months: request.term_months,
      },
      &cancel,
    )
    .await?;

  Ok(HttpResponse::Created().json(LoanResponse {
    loan: response.loan,
  }))
}

/// GET /loans/{id}
///
/// Only the owner of the loan can see it; other callers get 404.
pub async fn view_loan_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<ViewLoanUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;
  let (cancel, _guard) = request_cancellation();

  let response = use_case
    .execute(
      &actor,
      ViewLoanCommand {
        loan_id: path.into_inner(),
      },
      &cancel,
    )
    .await?;

  Ok(HttpResponse::Ok().json(LoanResponse {
    loan: response.loan,
  }))
}

/// GET /admin/loans?status=&order=&limit=&offset=
pub async fn list_loans_handler(
  query: web::Query<LoanListQuery>,
  use_case: web::Data<Arc<ListLoansUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;
  let query = query.into_inner();
  let (cancel, _guard) = request_cancellation();

  let response = use_case
    .execute(
      &actor,
      ListLoansCommand {
        status: query.status,
        order: query.order,
        limit: query.limit,
        offset: query.offset,
      },
      &cancel,
    )
    .await?;

  Ok(HttpResponse::Ok().json(LoanListResponse {
    loans: response.loans,
    current_page: response.current_page,
    per_page: response.per_page,
    total: response.total,
    total_pages: response.total_pages,
  }))
}

/// PATCH /admin/loans/{id}/status
///
/// Body: `{"status": "approved"|"rejected", "rejection_reason": ...}`
pub async fn update_loan_status_handler(
  path: web::Path<String>,
  request: web::Json<UpdateLoanStatusRequest>,
  use_case: web::Data<Arc<UpdateLoanStatusUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;
  let request = request.into_inner();
  let (cancel, _guard) = request_cancellation();

  let response = use_case
    .execute(
      &actor,
      UpdateLoanStatusCommand {
        loan_id: path.into_inner(),
        status: request.status,
        rejection_reason: request.rejection_reason,
      },
      &cancel,
    )
    .await?;

  Ok(HttpResponse::Ok().json(LoanResponse {
    loan: response.loan,
  }))
}

/// DELETE /admin/loans/{id}
pub async fn delete_loan_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<DeleteLoanUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;
  let (cancel, _guard) = request_cancellation();

  use_case
    .execute(
      &actor,
      DeleteLoanCommand {
        loan_id: path.into_inner(),
      },
      &cancel,
    )
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse::new("Loan deleted successfully")))
}
