pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{ErrorResponse, SuccessResponse};
pub use errors::ApiError;
pub use middleware::{AuthMiddleware, AuthUser, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{RouteDependencies, configure_routes};
