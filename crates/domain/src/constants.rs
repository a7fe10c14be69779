//! Wallet API constants
//!
//! Centralized location for protocol-level constants and configuration
//! defaults shared by the client crates.

use std::time::Duration;

// Token constants
/// `typ` header of every token.
pub const TOKEN_TYPE: &str = "JWT";
/// `sub` claim of every token.
pub const TOKEN_SUBJECT: &str = "wallet";
/// Random bytes in the `nonce` claim.
pub const NONCE_LEN: usize = 20;

// Endpoints (relative to the configured base URL)
/// Read-only calls.
pub const QUERY_PATH: &str = "/query";
/// State-changing calls.
pub const COMMAND_PATH: &str = "/command";

// HTTP
/// Wait hint on 429 responses.
pub const RETRY_AFTER_HEADER: &str = "Retry-After";
/// `Authorization` scheme prefix.
pub const BEARER_PREFIX: &str = "Bearer ";
/// Upper bound on how much of an unstructured error body is kept in an error
/// message.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

// Configuration defaults
/// Base URL when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Query retries after the first attempt.
pub const DEFAULT_MAX_READ_RETRY: u32 = 5;
/// Pause between query retries.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(50);
/// 429 waits allowed per call.
pub const DEFAULT_MAX_RATE_LIMIT_RETRY: u32 = 3;
/// Per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Lifetime of a signed token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30);
