//! HTTP transport for signed wallet requests.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
