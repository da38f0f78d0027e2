//! User administration use cases (admin only)

mod delete_user;
mod list_users;

pub use delete_user::{DeleteUserCommand, DeleteUserResponse, DeleteUserUseCase};
pub use list_users::{ListUsersResponse, ListUsersUseCase};
