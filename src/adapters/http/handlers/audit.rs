use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use super::request_cancellation;
use crate::adapters::http::{
  dtos::{AuditLogListResponse, AuditLogQuery},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::audit::{ViewAuditLogCommand, ViewAuditLogUseCase};

/// GET /admin/logs?event=&order=&limit=&offset=
pub async fn view_logs_handler(
  query: web::Query<AuditLogQuery>,
  use_case: web::Data<Arc<ViewAuditLogUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;
  let query = query.into_inner();
  let (cancel, _guard) = request_cancellation();

  let response = use_case
    .execute(
      &actor,
      ViewAuditLogCommand {
        event: query.event,
        order: query.order,
        limit: query.limit,
        offset: query.offset,
      },
      &cancel,
    )
    .await?;

  Ok(HttpResponse::Ok().json(AuditLogListResponse {
    logs: response.logs,
    current_page: response.current_page,
    per_page: response.per_page,
    total: response.total,
    total_pages: response.total_pages,
  }))
}
