//! Authentication and account lifecycle use cases
//!
//! This module contains all authentication-related use cases that orchestrate
//! domain services to implement application-specific workflows.

mod activate_account;
mod get_profile;
mod login_user;
mod logout_user;
mod refresh_tokens;
mod register_user;
mod request_password_reset;
mod resend_verification_email;
mod update_password;

pub use activate_account::{ActivateAccountCommand, ActivateAccountUseCase};
pub use get_profile::{GetProfileUseCase, UserProfile};
pub use login_user::{LoginUserCommand, LoginUserResponse, LoginUserUseCase};
pub use logout_user::{LogoutUserCommand, LogoutUserResponse, LogoutUserUseCase};
pub use refresh_tokens::{RefreshTokensCommand, RefreshTokensResponse, RefreshTokensUseCase};
pub use register_user::{RegisterUserCommand, RegisterUserResponse, RegisterUserUseCase};
pub use request_password_reset::{RequestPasswordResetCommand, RequestPasswordResetUseCase};
pub use resend_verification_email::{
  ResendVerificationEmailCommand, ResendVerificationEmailUseCase,
};
pub use update_password::{UpdatePasswordCommand, UpdatePasswordUseCase};
