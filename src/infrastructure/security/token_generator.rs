use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::TokenGenerator;

/// Opaque one-time tokens: 32 bytes from the OS RNG, base64url without padding
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureTokenGenerator;

impl SecureTokenGenerator {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl TokenGenerator for SecureTokenGenerator {
  async fn generate(&self) -> Result<String, AuthError> {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng
      .try_fill_bytes(&mut bytes)
      .map_err(|e| AuthError::Internal(format!("Random source unavailable: {}", e)))?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_tokens_are_unique() {
    let generator = SecureTokenGenerator::new();

    let first = generator.generate().await.unwrap();
    let second = generator.generate().await.unwrap();

    assert_ne!(first, second);
  }

  #[tokio::test]
  async fn test_token_is_url_safe() {
    let token = SecureTokenGenerator::new().generate().await.unwrap();

    // 32 bytes without padding
    assert_eq!(token.len(), 43);
    assert!(
      token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
  }
}
