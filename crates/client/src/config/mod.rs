//! Configuration loading
//!
//! Convenience loaders for [`wallet_domain::ClientConfig`]. The client never
//! reads the environment on its own.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, load_from_lookup};
