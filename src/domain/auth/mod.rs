pub mod account;
pub mod entities;
pub mod errors;
pub mod locks;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use account::{AccountService, Registration};
pub use entities::{RefreshTokenSession, TokenClaims, TokenKind, TokenPair, User};
pub use errors::{AuthError, HashError, MailError, TokenError};
pub use locks::UserLocks;
pub use services::AuthService;
pub use value_objects::{
  Actor, DeviceFingerprint, Email, Password, PasswordHash, Role, TokenHash, UserId,
  ValueObjectError,
};
