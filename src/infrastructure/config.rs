use chrono::Duration;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::fmt;

use crate::domain::pagination::PageLimits;

fn default_access_token_ttl_hours() -> i64 {
  1
}

fn default_refresh_token_ttl_hours() -> i64 {
  24 * 7
}

fn default_one_time_token_ttl_hours() -> i64 {
  24
}

fn default_page_limit() -> u64 {
  10
}

fn default_max_page_limit() -> u64 {
  100
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  pub security: SecurityConfig,
  #[serde(default)]
  pub pagination: PaginationConfig,
  /// First admin account, created at start-up if the email is unknown
  #[serde(default)]
  pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  /// Public URL used in activation and reset links
  pub base_url: String,
}

/// Security configuration
#[derive(Clone, Deserialize)]
pub struct SecurityConfig {
  /// HS256 secret for access tokens; empty disables issuing
  pub access_token_secret: String,
  /// HS256 secret for refresh tokens; empty disables issuing
  pub refresh_token_secret: String,
  #[serde(default = "default_access_token_ttl_hours")]
  pub access_token_ttl_hours: i64,
  #[serde(default = "default_refresh_token_ttl_hours")]
  pub refresh_token_ttl_hours: i64,
  /// Validity of activation tokens
  #[serde(default = "default_one_time_token_ttl_hours")]
  pub activation_token_ttl_hours: i64,
  /// Validity of password reset tokens
  #[serde(default = "default_one_time_token_ttl_hours")]
  pub reset_token_ttl_hours: i64,
}

impl SecurityConfig {
  pub fn access_token_ttl(&self) -> Duration {
    Duration::hours(self.access_token_ttl_hours)
  }

  pub fn refresh_token_ttl(&self) -> Duration {
    Duration::hours(self.refresh_token_ttl_hours)
  }

  pub fn activation_token_ttl(&self) -> Duration {
    Duration::hours(self.activation_token_ttl_hours)
  }

  pub fn reset_token_ttl(&self) -> Duration {
    Duration::hours(self.reset_token_ttl_hours)
  }
}

impl fmt::Debug for SecurityConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SecurityConfig")
      .field("access_token_secret", &"***")
      .field("refresh_token_secret", &"***")
      .field("access_token_ttl_hours", &self.access_token_ttl_hours)
      .field("refresh_token_ttl_hours", &self.refresh_token_ttl_hours)
      .field("activation_token_ttl_hours", &self.activation_token_ttl_hours)
      .field("reset_token_ttl_hours", &self.reset_token_ttl_hours)
      .finish()
  }
}

/// Listing limits
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
  #[serde(default = "default_page_limit")]
  pub default_limit: u64,
  #[serde(default = "default_max_page_limit")]
  pub max_limit: u64,
}

impl PaginationConfig {
  pub fn limits(&self) -> PageLimits {
    PageLimits {
      default_limit: self.default_limit,
      max_limit: self.max_limit,
    }
  }
}

impl Default for PaginationConfig {
  fn default() -> Self {
    Self {
      default_limit: default_page_limit(),
      max_limit: default_max_page_limit(),
    }
  }
}

#[derive(Clone, Deserialize)]
pub struct BootstrapAdminConfig {
  pub username: String,
  pub email: String,
  pub password: String,
}

impl fmt::Debug for BootstrapAdminConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BootstrapAdminConfig")
      .field("username", &self.username)
      .field("email", &self.email)
      .field("password", &"***")
      .finish()
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with LOANBOOK_ prefix
  ///
  /// # Environment Variables
  ///
  /// Environment variables use the LOANBOOK_ prefix and are separated by double underscores:
  /// - `LOANBOOK_SERVER__PORT=8080`
  /// - `LOANBOOK_SECURITY__ACCESS_TOKEN_SECRET=...`
  /// - `LOANBOOK_SECURITY__REFRESH_TOKEN_SECRET=...`
  /// - `LOANBOOK_BOOTSTRAP_ADMIN__PASSWORD=...`
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("LOANBOOK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }
}
