//! Per-request token construction and signing
//!
//! - [`token`]: builds claims bound to one request body and path
//! - [`signer`]: parses the private key, signs, and formats the compact token

pub mod signer;
pub mod token;

pub use signer::{sign_and_format, KeyMaterial, PrivateKey};
pub use token::{body_hash, UnsignedToken};
