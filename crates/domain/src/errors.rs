//! Error types used throughout the wallet client

use std::time::Duration;

use thiserror::Error;

/// Categories of wallet errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Client misconfiguration - non-retryable
    Configuration,
    /// Missing or unusable key material - non-retryable
    Credentials,
    /// Token construction or signing failures - non-retryable
    Signing,
    /// Network/connection errors - retryable for queries
    Transport,
    /// Server errors (5xx) - retryable for queries
    Server,
    /// Rate limiting errors (429) - retry after the server's hint
    RateLimit,
    /// Client errors (4xx except 429) - non-retryable
    Client,
    /// Cancellation or an elapsed deadline - never retried
    Cancellation,
    /// Request encoding or response decoding - non-retryable
    Encoding,
}

/// Main error type for wallet API calls
#[derive(Error, Debug)]
pub enum WalletError {
    /// No usable key id or private key.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Key bytes are not a supported PEM private key.
    #[error("Invalid private key: {0}")]
    KeyFormat(String),

    /// The OS random source failed.
    #[error("Randomness unavailable: {0}")]
    Randomness(String),

    /// The signature operation itself failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Connection, timeout or other failure before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// 5xx response.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status, 5xx.
        status: u16,
        /// Summary of the response body.
        message: String,
    },

    /// 429 response.
    #[error("Rate limit exceeded, retry after {retry_after:?}: {message}")]
    RateLimited {
        /// Wait requested by `Retry-After`, or the retry interval.
        retry_after: Duration,
        /// Summary of the response body.
        message: String,
    },

    /// Non-retryable 4xx response.
    #[error("Client error ({status}): {message}")]
    Client {
        /// HTTP status, 4xx other than 429.
        status: u16,
        /// Summary of the response body.
        message: String,
    },

    /// The caller cancelled the call.
    #[error("Call cancelled")]
    Cancelled,

    /// The call outlived its deadline.
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request input could not be serialized.
    #[error("Failed to encode request: {0}")]
    Serialization(String),

    /// The response body could not be read or deserialized.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl WalletError {
    /// Error raised when neither a loader nor static credentials are available.
    pub fn credentials_not_set() -> Self {
        Self::MissingCredentials(
            "credentials are not set; configure a credentials loader or call set_credentials"
                .to_string(),
        )
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::MissingCredentials(_) | Self::KeyFormat(_) => ErrorCategory::Credentials,
            Self::Randomness(_) | Self::Signing(_) => ErrorCategory::Signing,
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Server { .. } => ErrorCategory::Server,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Client { .. } => ErrorCategory::Client,
            Self::Cancelled | Self::DeadlineExceeded => ErrorCategory::Cancellation,
            Self::Serialization(_) | Self::Decode(_) => ErrorCategory::Encoding,
        }
    }

    /// Whether a query may spend its server-error budget retrying this error.
    ///
    /// Rate limiting is handled separately through [`Self::retry_after`].
    pub fn is_retryable_for_query(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transport | ErrorCategory::Server)
    }

    /// Server-supplied wait before the call may be retried, for 429 responses.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// HTTP status code carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Stable label suitable for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => "missing_credentials",
            Self::KeyFormat(_) => "key_format",
            Self::Randomness(_) => "randomness",
            Self::Signing(_) => "signing",
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::RateLimited { .. } => "rate_limited",
            Self::Client { .. } => "client",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Decode(_) => "decode",
        }
    }
}

/// Result type alias for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;
