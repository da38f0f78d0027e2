mod argon2_hasher;
mod jwt_token_service;
mod token_generator;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_token_service::JwtTokenService;
pub use token_generator::SecureTokenGenerator;
