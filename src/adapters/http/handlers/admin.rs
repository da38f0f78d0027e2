use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{SuccessResponse, UserListResponse},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::admin::{DeleteUserCommand, DeleteUserUseCase, ListUsersUseCase};

/// GET /admin/users
pub async fn list_users_handler(
  use_case: web::Data<Arc<ListUsersUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;
  let response = use_case.execute(&actor).await?;

  Ok(HttpResponse::Ok().json(UserListResponse {
    users: response.users,
  }))
}

/// DELETE /admin/users/{id}
pub async fn delete_user_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<DeleteUserUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let actor = http_req.actor()?;

  use_case
    .execute(
      &actor,
      DeleteUserCommand {
        user_id: path.into_inner(),
      },
    )
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse::new("User deleted successfully")))
}
