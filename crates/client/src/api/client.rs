//! Wallet API client
//!
//! Exposes the two call primitives, [`WalletClient::query`] and
//! [`WalletClient::command`]. Typed endpoint wrappers are thin layers over
//! these.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use wallet_domain::{ClientConfig, RequestEnvelope, Result, WalletError};

use super::context::CallContext;
use super::dispatch::{CallKind, Reply, RequestDispatcher};
use crate::credentials::{CredentialResolver, CredentialsLoader};
use crate::errors::IntoWalletError;
use crate::http::HttpClient;

/// Client for the wallet API.
///
/// Safe to share across tasks. The only state mutated after construction is
/// the static credential slot (see [`WalletClient::set_credentials`]).
#[derive(Debug)]
pub struct WalletClient {
    dispatcher: RequestDispatcher,
}

impl WalletClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> WalletClientBuilder {
        WalletClientBuilder::default()
    }

    /// Create a client from `config` with static credentials only.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::Config` if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Normalized configuration in effect.
    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    /// Store the key identifier and PEM private key used when no credentials
    /// loader is configured. Ignored when a loader is configured.
    ///
    /// Updating credentials while calls are in flight is allowed; each
    /// attempt signs with whichever credentials it resolved. Callers that
    /// need a specific call to see an update must order the two themselves.
    pub fn set_credentials(&self, key_id: &str, private_key_pem: impl Into<Vec<u8>>) {
        self.dispatcher.credentials().set_static(key_id, private_key_pem.into());
    }

    /// Forget static credentials. Subsequent calls fail with
    /// `MissingCredentials` unless a loader is configured.
    pub fn clear_credentials(&self) {
        self.dispatcher.credentials().clear_static();
    }

    /// Execute a read-only call
    ///
    /// # Arguments
    ///
    /// * `ctx` - Cancellation and deadline for the whole call, retries included
    /// * `action` - Server-side action name
    /// * `input` - Action input, serialized as JSON
    ///
    /// # Returns
    ///
    /// Deserialized response. Empty, 204 and 205 responses decode from `null`.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error once the retry budget is spent,
    /// immediately for non-retryable errors, or `Cancelled` /
    /// `DeadlineExceeded` when `ctx` fires.
    #[instrument(skip(self, ctx, input), fields(action = %action))]
    pub async fn query<I, O>(&self, ctx: &CallContext, action: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.call(ctx, CallKind::Query, action, input).await
    }

    /// Execute a state-changing call
    ///
    /// Transport failures and 5xx responses are never retried, so a command
    /// is sent at most once unless the server answers 429.
    ///
    /// # Errors
    ///
    /// See [`WalletClient::query`].
    #[instrument(skip(self, ctx, input), fields(action = %action))]
    pub async fn command<I, O>(&self, ctx: &CallContext, action: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.call(ctx, CallKind::Command, action, input).await
    }

    async fn call<I, O>(&self, ctx: &CallContext, kind: CallKind, action: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(&RequestEnvelope { action, input })
            .map_err(|e| WalletError::Serialization(e.to_string()))?;

        let reply = self.dispatcher.dispatch(ctx, kind, &body).await?;
        if self.config().debug {
            debug!(status = %reply.status, bytes = reply.body.len(), "decoding response");
        }

        decode_reply(&reply)
    }
}

fn decode_reply<O: DeserializeOwned>(reply: &Reply) -> Result<O> {
    let no_content = reply.status == StatusCode::NO_CONTENT
        || reply.status == StatusCode::RESET_CONTENT
        || reply.body.iter().all(u8::is_ascii_whitespace);

    if no_content {
        return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
            WalletError::Decode(format!(
                "empty response ({}) cannot be decoded into the requested type",
                reply.status.as_u16()
            ))
        });
    }

    serde_json::from_slice(&reply.body).map_err(|e| WalletError::Decode(e.to_string()))
}

/// Builder for [`WalletClient`]
#[derive(Default)]
pub struct WalletClientBuilder {
    config: Option<ClientConfig>,
    http_client: Option<reqwest::Client>,
    loader: Option<Arc<dyn CredentialsLoader>>,
}

impl WalletClientBuilder {
    /// Set the client configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Reuse an existing `reqwest` client. The configured request timeout
    /// still applies to every request.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Fetch credentials from `loader` on every attempt instead of using
    /// static credentials.
    pub fn credentials_loader(mut self, loader: impl CredentialsLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Same as [`Self::credentials_loader`] for an already shared loader.
    pub fn shared_credentials_loader(mut self, loader: Arc<dyn CredentialsLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Build the wallet client
    ///
    /// # Errors
    ///
    /// Returns `WalletError::Config` if the base URL does not parse or the
    /// HTTP client cannot be built.
    pub fn build(self) -> Result<WalletClient> {
        let config = self.config.unwrap_or_default().normalized();
        url::Url::parse(&config.base_url).map_err(IntoWalletError::into_wallet)?;

        let mut http = HttpClient::builder().timeout(config.request_timeout);
        if let Some(client) = self.http_client {
            http = http.client(client);
        }
        let http = http.build()?;

        let credentials = CredentialResolver::new(self.loader, config.debug);

        Ok(WalletClient { dispatcher: RequestDispatcher::new(http, credentials, config) })
    }
}
