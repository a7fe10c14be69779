//! Configuration loader
//!
//! Builds a [`ClientConfig`] from environment variables or a file. Every
//! setting is optional; anything not provided keeps its default.
//!
//! ## Environment Variables
//! - `WALLET_BASE_URL`: Base URL of the wallet API
//! - `WALLET_MAX_READ_RETRY`: Query retries after transport or 5xx failures
//! - `WALLET_RETRY_INTERVAL_MS`: Wait between query retries, in milliseconds
//! - `WALLET_MAX_RATE_LIMIT_RETRY`: 429 responses a call may wait out
//! - `WALLET_RETRY_RATE_LIMITED_COMMANDS`: Whether commands honour 429
//!   (true/false)
//! - `WALLET_REQUEST_TIMEOUT_MS`: Per-request timeout, in milliseconds
//! - `WALLET_TOKEN_TTL_SECS`: Signed token lifetime, in seconds
//! - `WALLET_DEBUG`: Per-attempt diagnostics (true/false)
//!
//! ## Files
//! JSON or TOML, detected by extension, using the same keys in snake case
//! without the `WALLET_` prefix:
//!
//! ```toml
//! base_url = "https://wallet.example.com/api"
//! max_read_retry = 3
//! retry_interval_ms = 100
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use wallet_domain::{ClientConfig, Result, WalletError};

use crate::errors::IntoWalletError;

const ENV_BASE_URL: &str = "WALLET_BASE_URL";
const ENV_MAX_READ_RETRY: &str = "WALLET_MAX_READ_RETRY";
const ENV_RETRY_INTERVAL_MS: &str = "WALLET_RETRY_INTERVAL_MS";
const ENV_MAX_RATE_LIMIT_RETRY: &str = "WALLET_MAX_RATE_LIMIT_RETRY";
const ENV_RETRY_RATE_LIMITED_COMMANDS: &str = "WALLET_RETRY_RATE_LIMITED_COMMANDS";
const ENV_REQUEST_TIMEOUT_MS: &str = "WALLET_REQUEST_TIMEOUT_MS";
const ENV_TOKEN_TTL_SECS: &str = "WALLET_TOKEN_TTL_SECS";
const ENV_DEBUG: &str = "WALLET_DEBUG";

/// Flat, fully optional view of the configuration shared by every source.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Settings {
    base_url: Option<String>,
    max_read_retry: Option<u32>,
    retry_interval_ms: Option<u64>,
    max_rate_limit_retry: Option<u32>,
    retry_rate_limited_commands: Option<bool>,
    request_timeout_ms: Option<u64>,
    token_ttl_secs: Option<u64>,
    debug: Option<bool>,
}

impl Settings {
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            base_url: lookup(ENV_BASE_URL),
            max_read_retry: parse_var(&lookup, ENV_MAX_READ_RETRY)?,
            retry_interval_ms: parse_var(&lookup, ENV_RETRY_INTERVAL_MS)?,
            max_rate_limit_retry: parse_var(&lookup, ENV_MAX_RATE_LIMIT_RETRY)?,
            retry_rate_limited_commands: bool_var(&lookup, ENV_RETRY_RATE_LIMITED_COMMANDS)?,
            request_timeout_ms: parse_var(&lookup, ENV_REQUEST_TIMEOUT_MS)?,
            token_ttl_secs: parse_var(&lookup, ENV_TOKEN_TTL_SECS)?,
            debug: bool_var(&lookup, ENV_DEBUG)?,
        })
    }

    /// Values set in `other` win.
    fn overlay(self, other: Self) -> Self {
        Self {
            base_url: other.base_url.or(self.base_url),
            max_read_retry: other.max_read_retry.or(self.max_read_retry),
            retry_interval_ms: other.retry_interval_ms.or(self.retry_interval_ms),
            max_rate_limit_retry: other.max_rate_limit_retry.or(self.max_rate_limit_retry),
            retry_rate_limited_commands: other
                .retry_rate_limited_commands
                .or(self.retry_rate_limited_commands),
            request_timeout_ms: other.request_timeout_ms.or(self.request_timeout_ms),
            token_ttl_secs: other.token_ttl_secs.or(self.token_ttl_secs),
            debug: other.debug.or(self.debug),
        }
    }

    fn into_config(self) -> ClientConfig {
        let mut config = ClientConfig::default();

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(max) = self.max_read_retry {
            config.retry.max_read_retry = max;
        }
        if let Some(ms) = self.retry_interval_ms {
            config.retry.retry_interval = Duration::from_millis(ms);
        }
        if let Some(max) = self.max_rate_limit_retry {
            config.retry.max_rate_limit_retry = max;
        }
        if let Some(enabled) = self.retry_rate_limited_commands {
            config.retry.retry_rate_limited_commands = enabled;
        }
        if let Some(ms) = self.request_timeout_ms {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = self.token_ttl_secs {
            config.token_ttl = Duration::from_secs(secs);
        }
        if let Some(debug) = self.debug {
            config.debug = debug;
        }

        config.normalized()
    }
}

/// Load configuration from `path` if given, then apply environment
/// overrides.
///
/// # Errors
/// Returns `WalletError::Config` if the file cannot be read or parsed, or a
/// variable has an invalid value.
pub fn load(path: Option<&Path>) -> Result<ClientConfig> {
    let base = match path {
        Some(path) => read_settings(path)?,
        None => Settings::default(),
    };
    let env = Settings::from_lookup(|key| std::env::var(key).ok())?;

    Ok(base.overlay(env).into_config())
}

/// Load configuration from `WALLET_*` environment variables.
///
/// # Errors
/// Returns `WalletError::Config` if a variable is set to an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`], reading variables through `lookup`.
///
/// # Errors
/// Returns `WalletError::Config` if a variable is set to an invalid value.
pub fn load_from_lookup<F>(lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    Settings::from_lookup(lookup).map(Settings::into_config)
}

/// Load configuration from a JSON or TOML file.
///
/// # Errors
/// Returns `WalletError::Config` if the file is missing, unreadable, has an
/// unsupported extension, or does not parse.
pub fn load_from_file(path: &Path) -> Result<ClientConfig> {
    read_settings(path).map(Settings::into_config)
}

fn read_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(WalletError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading wallet client configuration from file");

    let contents = std::fs::read_to_string(path).map_err(IntoWalletError::into_wallet)?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(&contents).map_err(IntoWalletError::into_wallet),
        "json" => serde_json::from_str(&contents)
            .map_err(|e| WalletError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WalletError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| WalletError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`
/// (case-insensitive).
fn bool_var<F>(lookup: &F, key: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(WalletError::Config(format!("Invalid boolean for {key}: {other}"))),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::Builder;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_environment_yields_defaults() {
        let config = load_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_from_lookup_all_vars_set() {
        let config = load_from_lookup(lookup_from(&[
            (ENV_BASE_URL, "https://wallet.test/api/"),
            (ENV_MAX_READ_RETRY, "2"),
            (ENV_RETRY_INTERVAL_MS, "250"),
            (ENV_MAX_RATE_LIMIT_RETRY, "7"),
            (ENV_RETRY_RATE_LIMITED_COMMANDS, "off"),
            (ENV_REQUEST_TIMEOUT_MS, "1500"),
            (ENV_TOKEN_TTL_SECS, "60"),
            (ENV_DEBUG, "YES"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://wallet.test/api");
        assert_eq!(config.retry.max_read_retry, 2);
        assert_eq!(config.retry.retry_interval, Duration::from_millis(250));
        assert_eq!(config.retry.max_rate_limit_retry, 7);
        assert!(!config.retry.retry_rate_limited_commands);
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert!(config.debug);
    }

    #[test]
    fn test_non_positive_values_fall_back_to_defaults() {
        let config = load_from_lookup(lookup_from(&[
            (ENV_MAX_READ_RETRY, "0"),
            (ENV_RETRY_INTERVAL_MS, "0"),
        ]))
        .unwrap();

        assert_eq!(config.retry, wallet_domain::RetryConfig::default());
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = load_from_lookup(lookup_from(&[(ENV_MAX_READ_RETRY, "-1")])).unwrap_err();
        assert!(matches!(err, WalletError::Config(ref msg) if msg.contains(ENV_MAX_READ_RETRY)));
    }

    #[test]
    fn test_invalid_bool_is_config_error() {
        let err = load_from_lookup(lookup_from(&[(ENV_DEBUG, "maybe")])).unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn test_load_from_file_toml() {
        let file = write_config(
            ".toml",
            r#"
            base_url = "https://wallet.test"
            max_read_retry = 3
            retry_interval_ms = 20
            debug = true
            "#,
        );

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "https://wallet.test");
        assert_eq!(config.retry.max_read_retry, 3);
        assert_eq!(config.retry.retry_interval, Duration::from_millis(20));
        assert!(config.debug);
        assert_eq!(config.token_ttl, ClientConfig::default().token_ttl);
    }

    #[test]
    fn test_load_from_file_json() {
        let file = write_config(".json", r#"{"token_ttl_secs": 45, "retry_rate_limited_commands": false}"#);

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(45));
        assert!(!config.retry.retry_rate_limited_commands);
    }

    #[test]
    fn test_load_from_file_rejects_unknown_keys() {
        let file = write_config(".json", r#"{"max_retries": 4}"#);
        assert!(matches!(load_from_file(file.path()), Err(WalletError::Config(_))));
    }

    #[test]
    fn test_load_from_file_unsupported_extension() {
        let file = write_config(".yaml", "base_url: x");
        let err = load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_load_from_file_missing() {
        let err = load_from_file(Path::new("/nonexistent/wallet.toml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file_settings = Settings { max_read_retry: Some(2), debug: Some(true), ..Default::default() };
        let env_settings =
            Settings::from_lookup(lookup_from(&[(ENV_MAX_READ_RETRY, "4")])).unwrap();

        let config = file_settings.overlay(env_settings).into_config();
        assert_eq!(config.retry.max_read_retry, 4);
        assert!(config.debug);
    }
}
