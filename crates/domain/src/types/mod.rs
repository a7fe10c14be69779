//! Wire types shared by the wallet client
//!
//! - [`token`]: signed-token header and claims
//! - [`envelope`]: request envelope and error response bodies

pub mod envelope;
pub mod token;

pub use envelope::{ErrorBody, RequestEnvelope};
pub use token::{Algorithm, TokenClaims, TokenHeader};
