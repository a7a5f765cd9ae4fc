// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded from the environment at startup. A `.env` file in the
//! working directory is honored (see `main.rs`).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address (IP or hostname) | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DATA_DIR` | Root directory of the document store | `./data` |
//! | `ACCESS_TOKEN_SECRET` | Shared secret for signing bearer tokens | Required |
//! | `STRIPE_SECRET_KEY` | Payment gateway secret key | Unset (gateway disabled) |
//! | `STRIPE_API_BASE_URL` | Payment gateway base URL | `https://api.stripe.com` |
//! | `PAYMENT_CURRENCY` | Currency for payment intents | `usd` |
//! | `ROLE_CACHE_TTL_SECS` | Role lookup cache TTL (0 disables) | `0` |
//! | `ROLE_CACHE_CAPACITY` | Role lookup cache capacity | `1024` |
//! | `LOCK_ROLE_PROMOTION` | Require admin for role promotion routes | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the document store root.
///
/// Every collection lives in its own subdirectory below this path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";
pub const STRIPE_SECRET_KEY_ENV: &str = "STRIPE_SECRET_KEY";
pub const STRIPE_API_BASE_URL_ENV: &str = "STRIPE_API_BASE_URL";
pub const PAYMENT_CURRENCY_ENV: &str = "PAYMENT_CURRENCY";
pub const ROLE_CACHE_TTL_ENV: &str = "ROLE_CACHE_TTL_SECS";
pub const ROLE_CACHE_CAPACITY_ENV: &str = "ROLE_CACHE_CAPACITY";
pub const LOCK_ROLE_PROMOTION_ENV: &str = "LOCK_ROLE_PROMOTION";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_STRIPE_API_BASE_URL: &str = "https://api.stripe.com";
pub const DEFAULT_PAYMENT_CURRENCY: &str = "usd";
pub const DEFAULT_ROLE_CACHE_CAPACITY: usize = 1024;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings for the payment gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// `None` leaves the gateway unconfigured; intent creation then fails.
    pub secret_key: Option<String>,
    pub api_base_url: String,
    pub currency: String,
}

/// Settings for the role lookup cache.
#[derive(Debug, Clone, Copy)]
pub struct RoleCacheConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl RoleCacheConfig {
    pub fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            capacity: DEFAULT_ROLE_CACHE_CAPACITY,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}

/// Fully parsed application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub token_secret: String,
    pub gateway: GatewayConfig,
    pub role_cache: RoleCacheConfig,
    /// When set, role promotion routes require an admin caller.
    pub lock_role_promotion: bool,
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let token_secret = vars
            .optional(ACCESS_TOKEN_SECRET_ENV)
            .ok_or(ConfigError::Missing(ACCESS_TOKEN_SECRET_ENV))?;

        let log_format = vars.or_default(LOG_FORMAT_ENV, "pretty");
        let json_logs = match log_format.to_ascii_lowercase().as_str() {
            "json" => true,
            "pretty" => false,
            other => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected `json` or `pretty`, got `{other}`"),
                })
            }
        };

        Ok(Self {
            host: vars.or_default(HOST_ENV, DEFAULT_HOST),
            port: vars.parse(PORT_ENV, DEFAULT_PORT)?,
            data_dir: PathBuf::from(vars.or_default(DATA_DIR_ENV, DEFAULT_DATA_DIR)),
            token_secret,
            gateway: GatewayConfig {
                secret_key: vars.optional(STRIPE_SECRET_KEY_ENV),
                api_base_url: vars
                    .or_default(STRIPE_API_BASE_URL_ENV, DEFAULT_STRIPE_API_BASE_URL),
                currency: vars
                    .or_default(PAYMENT_CURRENCY_ENV, DEFAULT_PAYMENT_CURRENCY)
                    .to_ascii_lowercase(),
            },
            role_cache: RoleCacheConfig {
                ttl: Duration::from_secs(vars.parse(ROLE_CACHE_TTL_ENV, 0u64)?),
                capacity: vars.parse(ROLE_CACHE_CAPACITY_ENV, DEFAULT_ROLE_CACHE_CAPACITY)?,
            },
            lock_role_promotion: vars.parse(LOCK_ROLE_PROMOTION_ENV, false)?,
            json_logs,
        })
    }

    /// Host and port to listen on. `HOST` may be an IP literal or a hostname.
    pub fn listen_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

/// Trimmed, non-empty variable access over a lookup function.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(ACCESS_TOKEN_SECRET_ENV, "secret")]).unwrap();
        assert_eq!(config.listen_addr(), (DEFAULT_HOST, DEFAULT_PORT));
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.token_secret, "secret");
        assert_eq!(config.gateway.secret_key, None);
        assert_eq!(config.gateway.api_base_url, DEFAULT_STRIPE_API_BASE_URL);
        assert_eq!(config.gateway.currency, DEFAULT_PAYMENT_CURRENCY);
        assert!(!config.role_cache.is_enabled());
        assert_eq!(config.role_cache.capacity, DEFAULT_ROLE_CACHE_CAPACITY);
        assert!(!config.lock_role_promotion);
        assert!(!config.json_logs);
    }

    #[test]
    fn missing_secret_is_reported() {
        assert!(matches!(
            load(&[]),
            Err(ConfigError::Missing(ACCESS_TOKEN_SECRET_ENV))
        ));
        assert!(matches!(
            load(&[(ACCESS_TOKEN_SECRET_ENV, "   ")]),
            Err(ConfigError::Missing(ACCESS_TOKEN_SECRET_ENV))
        ));
    }

    #[test]
    fn unknown_log_format_is_invalid() {
        let result = load(&[(ACCESS_TOKEN_SECRET_ENV, "secret"), (LOG_FORMAT_ENV, "xml")]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                ..
            })
        ));

        let json = load(&[(ACCESS_TOKEN_SECRET_ENV, "secret"), (LOG_FORMAT_ENV, "JSON")]).unwrap();
        assert!(json.json_logs);
    }

    #[test]
    fn unparsable_numbers_and_flags_are_invalid() {
        for (name, value) in [
            (PORT_ENV, "http"),
            (ROLE_CACHE_TTL_ENV, "-5"),
            (LOCK_ROLE_PROMOTION_ENV, "yes please"),
        ] {
            let result = load(&[(ACCESS_TOKEN_SECRET_ENV, "secret"), (name, value)]);
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: n, .. }) if n == name),
                "{name}={value} should be rejected"
            );
        }
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (ACCESS_TOKEN_SECRET_ENV, "secret"),
            (HOST_ENV, "localhost"),
            (PORT_ENV, "8080"),
            (DATA_DIR_ENV, "/var/lib/funtrek"),
            (STRIPE_SECRET_KEY_ENV, "sk_test_1"),
            (PAYMENT_CURRENCY_ENV, "EUR"),
            (ROLE_CACHE_TTL_ENV, "30"),
            (ROLE_CACHE_CAPACITY_ENV, "16"),
            (LOCK_ROLE_PROMOTION_ENV, "true"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr(), ("localhost", 8080));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/funtrek"));
        assert_eq!(config.gateway.secret_key.as_deref(), Some("sk_test_1"));
        assert_eq!(config.gateway.currency, "eur");
        assert_eq!(config.role_cache.ttl, Duration::from_secs(30));
        assert_eq!(config.role_cache.capacity, 16);
        assert!(config.role_cache.is_enabled());
        assert!(config.lock_role_promotion);
    }

    #[tokio::test]
    async fn hostname_listen_addr_binds() {
        let mut config = load(&[(ACCESS_TOKEN_SECRET_ENV, "secret"), (HOST_ENV, "localhost")])
            .unwrap();
        config.port = 0;
        let listener = tokio::net::TcpListener::bind(config.listen_addr())
            .await
            .unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
