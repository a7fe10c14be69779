//! Call primitives and dispatch
//!
//! - [`client`]: the public `WalletClient` and its builder
//! - [`context`]: per-call cancellation and deadline
//! - [`dispatch`]: attempt loop and retry policy

pub mod client;
pub mod context;
pub mod dispatch;

pub use client::{WalletClient, WalletClientBuilder};
pub use context::CallContext;
pub use dispatch::{CallKind, Reply, RequestDispatcher};
