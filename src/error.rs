//! Error types shared by the provider client, the document store and the
//! playlist orchestrator.
//!
//! Each layer returns its own error enum. The HTTP boundary
//! ([`crate::api::ApiError`]) is the only place where these are mapped to
//! status codes.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Body of a failed provider response.
///
/// Kept structured when the provider declared a JSON content type, raw text
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderErrorBody {
    Json(Value),
    Text(String),
}

impl fmt::Display for ProviderErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorBody::Json(value) => write!(f, "{}", value),
            ProviderErrorBody::Text(text) => write!(f, "{}", text),
        }
    }
}

/// A failed call against the playlist provider.
///
/// Transport failures (DNS, timeout, connection reset) never carry their
/// underlying cause; they are collapsed into [`ProviderError::internal`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("provider request failed with status {status}: {body}")]
pub struct ProviderError {
    pub status: u16,
    pub body: ProviderErrorBody,
}

impl ProviderError {
    pub fn new(status: u16, body: ProviderErrorBody) -> Self {
        Self { status, body }
    }

    /// The generic 500 used for every transport-level failure.
    pub fn internal() -> Self {
        Self {
            status: 500,
            body: ProviderErrorBody::Text("internal error".to_string()),
        }
    }
}

/// Failures of the document store itself, as opposed to bad records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read collection {collection}: {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },
    #[error("collection {collection} is malformed: {reason}")]
    Malformed { collection: String, reason: String },
}

/// A stored record that does not match the expected schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid record in {collection}: {reason}")]
pub struct ValidationError {
    pub collection: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}

/// Failures of the OAuth token endpoint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("token endpoint returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("token endpoint unreachable")]
    Transport,
    #[error("unexpected token response: {0}")]
    InvalidResponse(String),
}

/// Everything the playlist orchestrator can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
