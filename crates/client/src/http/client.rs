//! Signed POST transport over reqwest

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Response};
use tracing::debug;
use wallet_domain::constants::{BEARER_PREFIX, DEFAULT_REQUEST_TIMEOUT};
use wallet_domain::Result;

use crate::errors::IntoWalletError;

/// Thin HTTP transport: one signed POST per call, no retries.
///
/// Retry policy lives in the dispatcher; this type only shapes requests and
/// enforces the per-request timeout.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Timeout applied to every request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST `body` as JSON to `url`, carrying `token` as a bearer credential.
    ///
    /// Non-2xx statuses are returned as responses; only transport failures
    /// are errors.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::Transport` on connection failures and timeouts.
    pub async fn post_signed(&self, url: &str, token: &str, body: Vec<u8>) -> Result<Response> {
        let request = self
            .client
            .post(url)
            .timeout(self.timeout)
            .header(AUTHORIZATION, format!("{BEARER_PREFIX}{token}"))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(IntoWalletError::into_wallet)?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response =
            self.client.execute(request).await.map_err(IntoWalletError::into_wallet)?;
        debug!(%method, %url, status = %response.status(), "received HTTP response");

        Ok(response)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    client: Option<ReqwestClient>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            client: None,
        }
    }
}

impl HttpClientBuilder {
    /// Timeout applied to every request, including requests sent through a
    /// caller-supplied client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() { DEFAULT_REQUEST_TIMEOUT } else { timeout };
        self
    }

    /// Reuse an existing connection pool.
    pub fn client(mut self, client: ReqwestClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Finish building.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::Config` if the underlying client cannot be built.
    pub fn build(self) -> Result<HttpClient> {
        if let Some(client) = self.client {
            return Ok(HttpClient { client, timeout: self.timeout });
        }

        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .build()
            .map_err(IntoWalletError::into_wallet)?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}
