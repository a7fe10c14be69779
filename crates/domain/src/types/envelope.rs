//! Request envelope and error response bodies

use serde::{Deserialize, Serialize};

/// Body sent to both the query and the command endpoint.
#[derive(Debug, Serialize)]
pub struct RequestEnvelope<'a, I: ?Sized> {
    /// Server-side operation name.
    pub action: &'a str,
    /// Operation arguments, serialized as-is.
    pub input: &'a I,
}

/// Structured error body returned by the server on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Human-readable summary, or `None` when the body carried nothing useful.
    pub fn summary(&self) -> Option<String> {
        match (self.code.as_deref(), self.message.as_deref()) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (Some(code), None) => Some(code.to_string()),
            (None, Some(message)) => Some(message.to_string()),
            (None, None) => None,
        }
    }
}
