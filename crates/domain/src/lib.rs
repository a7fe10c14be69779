//! # Wallet Domain
//!
//! Data types shared by the wallet API client.
//!
//! This crate contains:
//! - Signed-token header and claims types
//! - Request envelope and error body types
//! - Client and retry configuration with defaults
//! - The [`WalletError`] taxonomy and [`Result`] alias
//! - Protocol constants
//!
//! ## Architecture
//! - No dependencies on other wallet crates
//! - No I/O; everything impure lives in `wallet-client`

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
