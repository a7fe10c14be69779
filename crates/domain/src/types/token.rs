//! Signed-token header and claims
//!
//! Field order and names match the wire format:
//! header `{"alg","typ"}`, payload
//! `{"bodyHash","exp","iat","nonce","sub","uri","kid"}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::TOKEN_TYPE;

/// Signing algorithm, inferred from the shape of the private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// ECDSA over P-256 with SHA-256.
    #[serde(rename = "ES256")]
    Es256,
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    #[serde(rename = "RS256")]
    Rs256,
}

impl Algorithm {
    /// JOSE name of the algorithm.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Es256 => "ES256",
            Self::Rs256 => "RS256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Signing algorithm.
    pub alg: Algorithm,
    /// Always `JWT`.
    pub typ: String,
}

impl TokenHeader {
    /// Header for a token signed with `alg`.
    pub fn new(alg: Algorithm) -> Self {
        Self { alg, typ: TOKEN_TYPE.to_string() }
    }
}

/// Token claims, bound to one request body and target path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Lowercase hex SHA-256 of the exact request body.
    #[serde(rename = "bodyHash")]
    pub body_hash: String,
    /// Expiry, unix seconds.
    #[serde(rename = "exp")]
    pub expires_at: i64,
    /// Issue time, unix seconds.
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Hex of 20 random bytes.
    pub nonce: String,
    /// Always `wallet`.
    #[serde(rename = "sub")]
    pub subject: String,
    /// Request path the token is valid for.
    pub uri: String,
    /// Key id the server verifies the signature against.
    #[serde(rename = "kid")]
    pub key_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_serialization() {
        let json = serde_json::to_string(&TokenHeader::new(Algorithm::Es256)).unwrap();
        assert_eq!(json, r#"{"alg":"ES256","typ":"JWT"}"#);

        let json = serde_json::to_string(&TokenHeader::new(Algorithm::Rs256)).unwrap();
        assert_eq!(json, r#"{"alg":"RS256","typ":"JWT"}"#);
    }

    #[test]
    fn test_claims_wire_names() {
        let claims = TokenClaims {
            body_hash: "ab".into(),
            expires_at: 20,
            issued_at: 10,
            nonce: "cd".into(),
            subject: "wallet".into(),
            uri: "/query".into(),
            key_id: "key-1".into(),
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert_eq!(
            json,
            r#"{"bodyHash":"ab","exp":20,"iat":10,"nonce":"cd","sub":"wallet","uri":"/query","kid":"key-1"}"#
        );
    }
}
