//! # Wallet Client
//!
//! Authenticated request engine for the wallet API.
//!
//! This crate contains:
//! - Per-request token construction and ES256/RS256 signing
//! - Credential resolution (loader first, static credentials second)
//! - Query/command dispatch with retry, backoff and rate-limit handling
//! - Configuration loaders for environment variables and files
//!
//! ## Architecture
//! - Data types and the error taxonomy live in `wallet-domain`
//! - Contains all "impure" code (HTTP, clock, randomness, key parsing)
//!
//! ## Example
//!
//! ```no_run
//! use wallet_client::{CallContext, WalletClient};
//! use wallet_domain::ClientConfig;
//!
//! # async fn run(pem: Vec<u8>) -> wallet_domain::Result<()> {
//! let client = WalletClient::new(ClientConfig {
//!     base_url: "https://wallet.example.com/api".into(),
//!     ..Default::default()
//! })?;
//! client.set_credentials("key-1", pem);
//!
//! let accounts: serde_json::Value = client
//!     .query(&CallContext::background(), "list_client_accounts", &serde_json::json!({}))
//!     .await?;
//! # let _ = accounts;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod signing;

// Re-export commonly used items
pub use api::{CallContext, CallKind, WalletClient, WalletClientBuilder};
pub use credentials::{CredentialResolver, Credentials, CredentialsLoader};
pub use errors::IntoWalletError;
pub use http::HttpClient;
pub use signing::{sign_and_format, UnsignedToken};
pub use tokio_util::sync::CancellationToken;
pub use wallet_domain::{ClientConfig, Result, RetryConfig, WalletError};
