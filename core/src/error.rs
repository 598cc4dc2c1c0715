//! Error types for the panel client.
//!
//! # Design
//! Every failed dispatch surfaces as exactly one of three kinds: the request
//! never completed (`Transport`), the panel rejected it (`Api`), or the panel
//! answered 2xx with a body that is not valid JSON (`Decode`). `Encode` and
//! `BadRequest` are raised before anything reaches the network.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpMethod;

/// The request did not complete a round-trip with the panel.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by `Dispatcher::dispatch` and the resource modules.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Connection, TLS, timeout or read failure. Idempotent requests may be retried.
    #[error("could not reach panel: {0}")]
    Transport(#[from] TransportError),

    /// The panel answered with a non-2xx status. `body` is the panel's error
    /// document as sent: parsed JSON, the raw text as a string, or `null`.
    #[error("panel returned HTTP {status}: {body}")]
    Api { status: u16, body: Value },

    /// A 2xx response whose body is not the expected JSON.
    #[error("malformed response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be serialized to JSON.
    #[error("request payload could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    /// Arguments rejected before a request was built.
    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl PanelError {
    /// HTTP status carried by `Api` and `Decode` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            PanelError::Api { status, .. } | PanelError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PanelError::Api { status: 404, .. })
    }

    /// Only transport failures are worth repeating, and only for verbs
    /// without side effects on repetition.
    pub fn is_retryable(&self, method: HttpMethod) -> bool {
        matches!(self, PanelError::Transport(_)) && method.is_idempotent()
    }
}
