//! Error types for the remote document-store boundary.
//!
//! The taxonomy is deliberately flat: callers distinguish "store not
//! reachable" from "store answered with an error", and everything else is
//! a decode problem. No error is retried automatically.

use thiserror::Error;

/// Errors that can occur when talking to the hosted document store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The store is not reachable (connection refused, DNS, timeout).
    #[error("document store not reachable at {url}: {message}")]
    NotReachable { url: String, message: String },

    /// The store answered with an error response.
    #[error("document store error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid base URL.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// No document with this identifier in the collection.
    #[error("document '{id}' not found in collection '{collection}'")]
    DocumentNotFound { collection: String, id: String },

    /// A wire document could not be decoded into its record type.
    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_reachable(url: impl Into<String>, message: impl ToString) -> Self {
        Self::NotReachable {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
