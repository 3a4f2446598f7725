//! Configuration management for the product API.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use product_api::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//! config.validate()?;
//!
//! println!("Listening on {}", config.bind_address());
//! println!("Auth policy: {:?}", config.auth_policy());
//! ```
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3000)
//! - `AUTH_MODE` - One of `none`, `api-key`, `bearer` (default: bearer)
//! - `API_KEY` - Secret compared against the `x-api-key` header in `api-key` mode
//! - `SEED_DATA` - Load the sample catalogue at startup (default: true)
//! - `CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use clap::{ArgAction, Parser, ValueEnum};

use crate::server::auth::AuthPolicy;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Which credential check guards the product routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthMode {
    /// No authentication
    None,

    /// Require `x-api-key` to match `API_KEY` on every product request
    ApiKey,

    /// Require any `Authorization: Bearer <token>` on mutating requests
    Bearer,
}

/// Product API - an in-memory product catalogue over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "product-api")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Authentication policy for the product routes.
    #[arg(long, value_enum, default_value_t = AuthMode::Bearer, env = "AUTH_MODE")]
    pub auth_mode: AuthMode,

    /// Shared secret for `--auth-mode api-key`.
    ///
    /// Required in that mode; ignored otherwise.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // =========================================================================
    // Data Configuration
    // =========================================================================
    /// Load the sample catalogue at startup.
    #[arg(long, default_value_t = true, action = ArgAction::Set, env = "SEED_DATA")]
    pub seed: bool,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth_mode == AuthMode::ApiKey
            && self.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(
                "API-key authentication is selected but no key provided. \
                 Set --api-key or API_KEY, or choose another --auth-mode"
                    .to_string(),
            );
        }

        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the auth policy selected by the configuration.
    ///
    /// Call [`Config::validate`] first; an unset key yields an empty secret.
    pub fn auth_policy(&self) -> AuthPolicy {
        match self.auth_mode {
            AuthMode::None => AuthPolicy::None,
            AuthMode::ApiKey => AuthPolicy::api_key(self.api_key.clone().unwrap_or_default()),
            AuthMode::Bearer => AuthPolicy::BearerPresence,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
