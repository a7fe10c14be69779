//! Conversions from third-party errors into [`WalletError`].
//!
//! [`WalletError`]: wallet_domain::WalletError

pub mod conversions;

pub use conversions::{error_from_status, IntoWalletError};
