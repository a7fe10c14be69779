//! Request dispatch with per-kind retry policy
//!
//! A call moves through an explicit state machine:
//!
//! ```text
//! Attempt ──ok──────────────────────────────▶ done
//!    │ err
//!    ▼
//! RetryPolicy::next ──▶ Backoff(interval)      ──▶ Attempt
//!                   ──▶ RateLimitWait(after)   ──▶ Attempt
//!                   ──▶ Terminal(error)        ──▶ done
//! ```
//!
//! Queries retry transport failures and 5xx responses up to
//! `max_read_retry` times. Commands never retry them. A 429 waits out its
//! `Retry-After` hint against a separate `max_rate_limit_retry` budget; for
//! commands only when `retry_rate_limited_commands` is set. Every attempt
//! resolves credentials and mints a fresh token, and every wait races the
//! caller's [`CallContext`].

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};
use wallet_domain::constants::{COMMAND_PATH, QUERY_PATH, RETRY_AFTER_HEADER};
use wallet_domain::{ClientConfig, Result, RetryConfig, WalletError};

use super::context::CallContext;
use crate::credentials::CredentialResolver;
use crate::errors::{error_from_status, IntoWalletError};
use crate::http::HttpClient;
use crate::signing::{sign_and_format, UnsignedToken};

/// Whether a call reads or mutates server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Read-only; retried on transport and 5xx failures.
    Query,
    /// State-changing; sent once unless rate limited.
    Command,
}

impl CallKind {
    /// Path the call is posted to, relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Query => QUERY_PATH,
            Self::Command => COMMAND_PATH,
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Command => f.write_str("command"),
        }
    }
}

/// Successful (2xx) response.
#[derive(Debug, Clone)]
pub struct Reply {
    /// 2xx status.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Vec<u8>,
}

#[derive(Debug)]
enum State {
    Attempt,
    Backoff(Duration),
    RateLimitWait(Duration),
    Terminal(WalletError),
}

/// Attempt counters for one call and the rules deciding what follows a
/// failed attempt.
#[derive(Debug)]
struct RetryPolicy<'a> {
    kind: CallKind,
    retry: &'a RetryConfig,
    server_retries: u32,
    rate_limit_waits: u32,
}

impl<'a> RetryPolicy<'a> {
    fn new(kind: CallKind, retry: &'a RetryConfig) -> Self {
        Self { kind, retry, server_retries: 0, rate_limit_waits: 0 }
    }

    fn next(&mut self, error: WalletError) -> State {
        if let Some(wait) = error.retry_after() {
            let allowed = match self.kind {
                CallKind::Query => true,
                CallKind::Command => self.retry.retry_rate_limited_commands,
            };
            if allowed && self.rate_limit_waits < self.retry.max_rate_limit_retry {
                self.rate_limit_waits += 1;
                return State::RateLimitWait(wait);
            }
            return State::Terminal(error);
        }

        if self.kind == CallKind::Query
            && error.is_retryable_for_query()
            && self.server_retries < self.retry.max_read_retry
        {
            self.server_retries += 1;
            return State::Backoff(self.retry.retry_interval);
        }

        State::Terminal(error)
    }
}

/// Parse `Retry-After` as whole seconds. HTTP-date values and garbage fall
/// back to `fallback`.
pub(crate) fn parse_retry_after(headers: &HeaderMap, fallback: Duration) -> Duration {
    headers
        .get(RETRY_AFTER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map_or(fallback, Duration::from_secs)
}

/// Sends signed calls and applies the retry policy.
#[derive(Debug)]
pub struct RequestDispatcher {
    http: HttpClient,
    credentials: CredentialResolver,
    config: ClientConfig,
}

impl RequestDispatcher {
    /// Dispatcher over `http`, signing with keys from `credentials`.
    pub fn new(http: HttpClient, credentials: CredentialResolver, config: ClientConfig) -> Self {
        Self { http, credentials, config }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolver used for every attempt.
    pub fn credentials(&self) -> &CredentialResolver {
        &self.credentials
    }

    /// Send `body` as a `kind` call until it succeeds or the policy gives up.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt, or `Cancelled` /
    /// `DeadlineExceeded` if `ctx` fires first.
    #[instrument(skip(self, ctx, body), fields(kind = %kind))]
    pub async fn dispatch(&self, ctx: &CallContext, kind: CallKind, body: &[u8]) -> Result<Reply> {
        let mut policy = RetryPolicy::new(kind, &self.config.retry);
        let mut attempts = 0u32;
        let mut state = State::Attempt;

        loop {
            state = match state {
                State::Attempt => {
                    attempts += 1;
                    match self.attempt(ctx, kind, body).await {
                        Ok(reply) => {
                            if self.config.debug {
                                debug!(attempts, status = %reply.status, "call succeeded");
                            }
                            return Ok(reply);
                        }
                        Err(error) => {
                            if self.config.debug {
                                debug!(attempt = attempts, error = %error, "attempt failed");
                            }
                            policy.next(error)
                        }
                    }
                }
                State::Backoff(wait) => {
                    if self.config.debug {
                        debug!(?wait, retry = policy.server_retries, "backing off before retry");
                    }
                    match ctx.sleep(wait).await {
                        Ok(()) => State::Attempt,
                        Err(error) => State::Terminal(error),
                    }
                }
                State::RateLimitWait(wait) => {
                    if self.config.debug {
                        debug!(?wait, wait_number = policy.rate_limit_waits, "rate limited, waiting");
                    }
                    match ctx.sleep(wait).await {
                        Ok(()) => State::Attempt,
                        Err(error) => State::Terminal(error),
                    }
                }
                State::Terminal(error) => {
                    warn!(attempts, error_type = error.label(), error = %error, "call failed");
                    return Err(error);
                }
            };
        }
    }

    /// One attempt: resolve, sign, send, and classify the response.
    async fn attempt(&self, ctx: &CallContext, kind: CallKind, body: &[u8]) -> Result<Reply> {
        ctx.check()?;

        let resolved = ctx.run(self.credentials.resolve()).await??;
        let token = UnsignedToken::build(&resolved.key_id, kind.path(), body, self.config.token_ttl)?;
        let signed = sign_and_format(&token, resolved.key)?;
        if self.config.debug {
            debug!(key_id = %resolved.key_id, uri = kind.path(), "sending signed request");
        }

        let url = format!("{}{}", self.config.base_url, kind.path());
        let response = ctx.run(self.http.post_signed(&url, &signed, body.to_vec())).await??;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers(), self.config.retry.retry_interval);
        let bytes = ctx.run(response.bytes()).await?.map_err(IntoWalletError::into_wallet)?;

        if !status.is_success() {
            return Err(error_from_status(status, retry_after, &bytes));
        }

        Ok(Reply { status, body: bytes.to_vec() })
    }
}
