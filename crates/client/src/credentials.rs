//! Credential resolution
//!
//! Each call resolves its key identifier and private key exactly once per
//! attempt, with a fixed priority:
//!
//! 1. A configured [`CredentialsLoader`] is invoked. Its key bytes are
//!    transient and wiped once the token is signed. Static credentials are
//!    never consulted while a loader is configured.
//! 2. Otherwise the client's static credentials are used. They are shared and
//!    persist across calls.
//! 3. With neither available the call fails with
//!    [`WalletError::MissingCredentials`].
//!
//! The static slot is a single-writer, multi-reader cell. A resolution takes
//! its own handle to the stored credentials, so updating the slot never
//! affects an attempt that has already resolved. Which in-flight calls see an
//! update is still up to the caller to serialize.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};
use wallet_domain::{Result, WalletError};
use zeroize::Zeroizing;

use crate::signing::KeyMaterial;

/// Key identifier and PEM private key returned by a [`CredentialsLoader`].
pub struct Credentials {
    /// Identifier the server looks the public key up by.
    pub key_id: String,
    /// PEM-encoded private key, wiped on drop.
    pub private_key_pem: Zeroizing<Vec<u8>>,
}

impl Credentials {
    /// Wrap `private_key_pem` so it is wiped on drop.
    pub fn new(key_id: impl Into<String>, private_key_pem: impl Into<Vec<u8>>) -> Self {
        Self { key_id: key_id.into(), private_key_pem: Zeroizing::new(private_key_pem.into()) }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("private_key_pem", &"***")
            .finish()
    }
}

/// Source of credentials invoked once per attempt.
///
/// Preferred over static credentials: key material only lives in memory for
/// the duration of one signing operation.
#[async_trait]
pub trait CredentialsLoader: Send + Sync {
    /// Fetch the key identifier and PEM private key.
    async fn load(&self) -> Result<Credentials>;
}

#[async_trait]
impl<F> CredentialsLoader for F
where
    F: Fn() -> Result<Credentials> + Send + Sync,
{
    async fn load(&self) -> Result<Credentials> {
        self()
    }
}

/// Outcome of a resolution: the key identifier and the material to sign with.
#[derive(Debug)]
pub struct ResolvedCredentials {
    /// Goes into the `kid` claim.
    pub key_id: String,
    /// PEM key to sign with.
    pub key: KeyMaterial,
}

struct StaticCredentials {
    key_id: String,
    private_key_pem: Arc<Zeroizing<Vec<u8>>>,
}

/// Decides which key material each call signs with.
pub struct CredentialResolver {
    loader: Option<Arc<dyn CredentialsLoader>>,
    static_slot: RwLock<Option<Arc<StaticCredentials>>>,
    debug: bool,
}

impl CredentialResolver {
    /// Resolver preferring `loader` when given, with an empty static slot.
    pub fn new(loader: Option<Arc<dyn CredentialsLoader>>, debug: bool) -> Self {
        Self { loader, static_slot: RwLock::new(None), debug }
    }

    /// Whether static credentials are ignored.
    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    /// Store static credentials. Ignored when a loader is configured.
    ///
    /// Returns whether the credentials were stored.
    pub fn set_static(&self, key_id: &str, private_key_pem: Vec<u8>) -> bool {
        if self.loader.is_some() {
            if self.debug {
                debug!(
                    key_id,
                    "ignoring static credentials because a credentials loader is configured"
                );
            }
            return false;
        }

        let credentials = StaticCredentials {
            key_id: key_id.to_string(),
            private_key_pem: Arc::new(Zeroizing::new(private_key_pem)),
        };
        *self.static_slot.write() = Some(Arc::new(credentials));
        true
    }

    /// Remove any static credentials.
    pub fn clear_static(&self) {
        self.static_slot.write().take();
    }

    /// Resolve credentials for one attempt.
    ///
    /// # Errors
    ///
    /// Propagates loader failures and returns
    /// [`WalletError::MissingCredentials`] when nothing is configured.
    #[instrument(skip(self), level = "debug")]
    pub async fn resolve(&self) -> Result<ResolvedCredentials> {
        if let Some(loader) = &self.loader {
            let credentials = loader.load().await?;
            if credentials.key_id.is_empty() {
                return Err(WalletError::MissingCredentials(
                    "credentials loader returned an empty key id".into(),
                ));
            }
            return Ok(ResolvedCredentials {
                key_id: credentials.key_id,
                key: KeyMaterial::Transient(credentials.private_key_pem),
            });
        }

        let stored = self.static_slot.read().clone();
        match stored {
            Some(stored) => Ok(ResolvedCredentials {
                key_id: stored.key_id.clone(),
                key: KeyMaterial::Persistent(Arc::clone(&stored.private_key_pem)),
            }),
            None => Err(WalletError::credentials_not_set()),
        }
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("has_loader", &self.loader.is_some())
            .field("has_static", &self.static_slot.read().is_some())
            .finish_non_exhaustive()
    }
}
