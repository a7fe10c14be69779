//! Per-request token construction
//!
//! An [`UnsignedToken`] carries the claims for exactly one HTTP attempt. The
//! header is not part of it: the algorithm is only known once the signer has
//! parsed the private key.

use std::time::Duration;

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use wallet_domain::constants::{NONCE_LEN, TOKEN_SUBJECT};
use wallet_domain::{Result, TokenClaims, WalletError};

/// Claims for one request, waiting to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedToken {
    claims: TokenClaims,
}

impl UnsignedToken {
    /// Build fresh claims bound to `body` and `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Randomness`] if the OS random source fails.
    pub fn build(key_id: &str, uri: &str, body: &[u8], ttl: Duration) -> Result<Self> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| WalletError::Randomness(format!("failed to read random bytes: {e}")))?;

        let issued_at = Utc::now().timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        Ok(Self {
            claims: TokenClaims {
                body_hash: body_hash(body),
                expires_at: issued_at.saturating_add(ttl_secs),
                issued_at,
                nonce: hex::encode(nonce),
                subject: TOKEN_SUBJECT.to_string(),
                uri: uri.to_string(),
                key_id: key_id.to_string(),
            },
        })
    }

    /// Claims that will be signed.
    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }
}

/// Lowercase hex SHA-256 of `body`.
pub fn body_hash(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}
