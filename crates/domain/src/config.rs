//! Client configuration structures

use std::time::Duration;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_MAX_RATE_LIMIT_RETRY, DEFAULT_MAX_READ_RETRY,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_INTERVAL, DEFAULT_TOKEN_TTL,
};

/// Retry behaviour for dispatched calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// How many times a query is retried after a transport or 5xx failure.
    pub max_read_retry: u32,
    /// Wait between query retries.
    pub retry_interval: Duration,
    /// How many 429 responses a single call may wait out before giving up.
    /// Counted separately from `max_read_retry`.
    pub max_rate_limit_retry: u32,
    /// Whether commands honour `Retry-After` on 429. A 429 means the command
    /// was refused before it ran, so retrying cannot duplicate its effect.
    pub retry_rate_limited_commands: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_read_retry: DEFAULT_MAX_READ_RETRY,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_rate_limit_retry: DEFAULT_MAX_RATE_LIMIT_RETRY,
            retry_rate_limited_commands: true,
        }
    }
}

impl RetryConfig {
    /// Replace zero values with their defaults.
    #[must_use]
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            max_read_retry: non_zero_or(self.max_read_retry, defaults.max_read_retry),
            retry_interval: non_zero_duration_or(self.retry_interval, defaults.retry_interval),
            max_rate_limit_retry: non_zero_or(
                self.max_rate_limit_retry,
                defaults.max_rate_limit_retry,
            ),
            retry_rate_limited_commands: self.retry_rate_limited_commands,
        }
    }
}

/// Configuration for the wallet API client.
///
/// Immutable once a client has been built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the query and command paths are appended to.
    pub base_url: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
    /// Lifetime of each signed token (`exp - iat`).
    pub token_ttl: Duration,
    /// Retry behaviour.
    pub retry: RetryConfig,
    /// Emit per-attempt diagnostics.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            token_ttl: DEFAULT_TOKEN_TTL,
            retry: RetryConfig::default(),
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Replace unset (zero or empty) values with their defaults.
    #[must_use]
    pub fn normalized(self) -> Self {
        let base_url = if self.base_url.trim().is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            self.base_url.trim_end_matches('/').to_string()
        };

        Self {
            base_url,
            request_timeout: non_zero_duration_or(self.request_timeout, DEFAULT_REQUEST_TIMEOUT),
            token_ttl: non_zero_duration_or(self.token_ttl, DEFAULT_TOKEN_TTL),
            retry: self.retry.normalized(),
            debug: self.debug,
        }
    }
}

fn non_zero_or(value: u32, default: u32) -> u32 {
    if value == 0 {
        default
    } else {
        value
    }
}

fn non_zero_duration_or(value: Duration, default: Duration) -> Duration {
    if value.is_zero() {
        default
    } else {
        value
    }
}
