//! Conversions from external infrastructure errors into wallet errors.

use std::time::Duration;

use reqwest::Error as HttpError;
use reqwest::StatusCode;
use wallet_domain::constants::MAX_ERROR_BODY_CHARS;
use wallet_domain::{ErrorBody, WalletError};

/// Keeps third-party error conversions on the client side of the crate
/// boundary, where the orphan rule forbids `From` impls.
pub trait IntoWalletError {
    /// Map into the wallet error taxonomy.
    fn into_wallet(self) -> WalletError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WalletError */
/* -------------------------------------------------------------------------- */

impl IntoWalletError for HttpError {
    fn into_wallet(self) -> WalletError {
        if self.is_timeout() {
            return WalletError::Transport("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return WalletError::Transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return WalletError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return WalletError::Decode(format!("failed to read response body: {self}"));
        }

        WalletError::Transport(self.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Config parsing errors → WalletError */
/* -------------------------------------------------------------------------- */

impl IntoWalletError for url::ParseError {
    fn into_wallet(self) -> WalletError {
        WalletError::Config(format!("invalid base URL: {self}"))
    }
}

impl IntoWalletError for toml::de::Error {
    fn into_wallet(self) -> WalletError {
        WalletError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl IntoWalletError for std::io::Error {
    fn into_wallet(self) -> WalletError {
        WalletError::Config(format!("Failed to read config file: {self}"))
    }
}

/* -------------------------------------------------------------------------- */
/* Non-2xx responses → WalletError */
/* -------------------------------------------------------------------------- */

/// Classify a non-success response.
///
/// `retry_after` is only used for 429 responses.
pub fn error_from_status(status: StatusCode, retry_after: Duration, body: &[u8]) -> WalletError {
    let message = describe_body(status, body);
    let code = status.as_u16();

    if status == StatusCode::TOO_MANY_REQUESTS {
        WalletError::RateLimited { retry_after, message }
    } else if status.is_server_error() {
        WalletError::Server { status: code, message }
    } else if status.is_client_error() {
        WalletError::Client { status: code, message }
    } else {
        WalletError::Transport(format!("unexpected HTTP status {code}: {message}"))
    }
}

fn describe_body(status: StatusCode, body: &[u8]) -> String {
    if let Some(summary) =
        serde_json::from_slice::<ErrorBody>(body).ok().and_then(|parsed| parsed.summary())
    {
        return summary;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return status.canonical_reason().unwrap_or("unknown status").to_string();
    }

    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
