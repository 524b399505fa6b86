//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOP2_PROVIDER_APP_ID` - Identity provider application id. Without it,
//!   social login reports the provider as unavailable.
//! - `SHOP2_PROVIDER_API_VERSION` - Provider API version (default: v2.8)
//! - `SHOP2_PROVIDER_COOKIE` - Let the provider set a session cookie (default: true)
//! - `SHOP2_PROVIDER_XFBML` - Let the provider parse page markup (default: true)
//! - `SHOP2_CATALOG_PATH` - YAML or JSON seed catalog (default: built-in catalog)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Fraction of errors sent to Sentry (default: 1.0)

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::error::Result as AppResult;
use crate::identity::InitOptions;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Identity provider settings
    pub provider: ProviderConfig,
    /// Seed catalog file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            catalog_path: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

/// Identity provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Application id registered with the provider (public, not a secret)
    pub app_id: Option<String>,
    /// Provider API version
    pub api_version: String,
    /// Let the provider keep a session cookie
    pub cookie: bool,
    /// Let the provider parse page markup
    pub xfbml: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_version: DEFAULT_PROVIDER_API_VERSION.to_string(),
            cookie: true,
            xfbml: true,
        }
    }
}

const DEFAULT_PROVIDER_API_VERSION: &str = "v2.8";

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an unparsable value.
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let provider = ProviderConfig::from_env()?;
        let catalog_path = get_optional_env("SHOP2_CATALOG_PATH").map(PathBuf::from);
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string())
            })
            .and_then(|rate| validate_sample_rate(rate, "SENTRY_SAMPLE_RATE"))?;

        Ok(Self {
            provider,
            catalog_path,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }

    /// Build the session's starting catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Seed` if the configured seed file is unusable.
    pub fn load_catalog(&self) -> AppResult<Catalog> {
        match &self.catalog_path {
            Some(path) => Ok(Catalog::load(path)?),
            None => Ok(Catalog::seed()),
        }
    }
}

impl ProviderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app_id: get_optional_env("SHOP2_PROVIDER_APP_ID").filter(|id| !id.trim().is_empty()),
            api_version: get_env_or_default(
                "SHOP2_PROVIDER_API_VERSION",
                DEFAULT_PROVIDER_API_VERSION,
            ),
            cookie: get_bool_env("SHOP2_PROVIDER_COOKIE", true)?,
            xfbml: get_bool_env("SHOP2_PROVIDER_XFBML", true)?,
        })
    }

    /// Options handed to the provider's `init` call.
    #[must_use]
    pub fn init_options(&self) -> InitOptions {
        InitOptions {
            cookie: self.cookie,
            xfbml: self.xfbml,
            version: self.api_version.clone(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a boolean environment variable with a default value.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| parse_bool(&value, key))
}

/// Parse the usual spellings of a boolean flag.
fn parse_bool(value: &str, var_name: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Validate that a sample rate is a fraction.
fn validate_sample_rate(rate: f32, var_name: &str) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
