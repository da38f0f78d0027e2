use chrono::Duration;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::{TokenClaims, TokenKind, User};
use crate::domain::auth::errors::TokenError;
use crate::domain::auth::ports::TokenService;
use crate::domain::clock::Clock;

struct SigningKey {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl: Duration,
}

impl SigningKey {
  fn from_secret(secret: &str, ttl: Duration) -> Option<Self> {
    if secret.is_empty() {
      return None;
    }
    Some(Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    })
  }
}

/// HS256 bearer tokens with one secret per token kind
///
/// Expiry is checked against the injected clock rather than the system
/// time, so the library's own `exp` validation is turned off.
pub struct JwtTokenService {
  access: Option<SigningKey>,
  refresh: Option<SigningKey>,
  clock: Arc<dyn Clock>,
}

impl JwtTokenService {
  /// An empty secret leaves that token kind unavailable; issuing fails with
  /// `TokenError::Signing`
  pub fn new(
    access_secret: &str,
    refresh_secret: &str,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self {
      access: SigningKey::from_secret(access_secret, access_ttl),
      refresh: SigningKey::from_secret(refresh_secret, refresh_ttl),
      clock,
    }
  }

  fn key(&self, kind: TokenKind) -> Result<&SigningKey, TokenError> {
    let key = match kind {
      TokenKind::Access => self.access.as_ref(),
      TokenKind::Refresh => self.refresh.as_ref(),
    };
    key.ok_or_else(|| TokenError::Signing(format!("no {} token secret configured", kind.as_str())))
  }

  fn issue(&self, user: &User, kind: TokenKind) -> Result<String, TokenError> {
    let key = self.key(kind)?;
    let now = self.clock.now();

    let claims = TokenClaims {
      sub: user.id.to_string(),
      role: match kind {
        TokenKind::Access => Some(user.role),
        TokenKind::Refresh => None,
      },
      kind,
      jti: Uuid::new_v4().to_string(),
      iat: now.timestamp(),
      exp: (now + key.ttl).timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &key.encoding)
      .map_err(|e| TokenError::Signing(e.to_string()))
  }
}

impl fmt::Debug for JwtTokenService {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JwtTokenService")
      .field("access", &self.access.as_ref().map(|k| k.ttl))
      .field("refresh", &self.refresh.as_ref().map(|k| k.ttl))
      .finish()
  }
}

impl TokenService for JwtTokenService {
  fn issue_access_token(&self, user: &User) -> Result<String, TokenError> {
    self.issue(user, TokenKind::Access)
  }

  fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError> {
    self.issue(user, TokenKind::Refresh)
  }

  fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError> {
    let key = self
      .key(expected)
      .map_err(|_| TokenError::Invalid("token kind not accepted".to_string()))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    let claims = decode::<TokenClaims>(token, &key.decoding, &validation)
      .map_err(|e| match e.kind() {
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
      })?
      .claims;

    if claims.kind != expected {
      return Err(TokenError::Invalid(format!(
        "expected {} token",
        expected.as_str()
      )));
    }

    if claims.exp <= self.clock.now().timestamp() {
      return Err(TokenError::Expired);
    }

    Ok(claims)
  }
}
