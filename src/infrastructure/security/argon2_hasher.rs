use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::HashError;
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id password hasher
///
/// 19 MiB memory, 2 iterations, 1 lane, 32-byte output. Hashing runs on the
/// blocking pool so a burst of logins does not stall the runtime workers.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  pub fn new() -> Result<Self, HashError> {
    let params = Params::new(19456, 2, 1, Some(32))
      .map_err(|e| HashError::HashingFailed(format!("Failed to create Argon2 params: {}", e)))?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError> {
    let argon2 = self.argon2.clone();
    let plain = password.as_str().as_bytes().to_vec();

    let encoded = tokio::task::spawn_blocking(move || {
      let salt = SaltString::generate(&mut rand::rngs::OsRng);
      argon2
        .hash_password(&plain, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::HashingFailed(e.to_string()))
    })
    .await
    .map_err(|e| HashError::HashingFailed(e.to_string()))??;

    PasswordHash::from_hash(encoded).map_err(|_| HashError::InvalidFormat)
  }

  /// Constant-time comparison is done inside `verify_password`
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, HashError> {
    let argon2 = self.argon2.clone();
    let plain = password.as_str().as_bytes().to_vec();
    let stored = hashed_password.as_str().to_string();

    tokio::task::spawn_blocking(move || {
      let parsed = Argon2PasswordHash::new(&stored).map_err(|_| HashError::InvalidFormat)?;
      match argon2.verify_password(&plain, &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError::VerificationFailed(e.to_string())),
      }
    })
    .await
    .map_err(|e| HashError::VerificationFailed(e.to_string()))?
  }
}
