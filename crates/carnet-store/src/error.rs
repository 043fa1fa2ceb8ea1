//! Error types for the state container and aggregation layer.

use thiserror::Error;

/// Errors surfaced by state actions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The remote document store rejected or failed the call.
    #[error(transparent)]
    Remote(#[from] carnet_remote::Error),

    /// A field check failed before the remote call was made.
    #[error(transparent)]
    Validation(#[from] carnet_types::ValidationError),

    /// A record cannot be deleted while other records still reference it.
    #[error("cannot delete {entity} '{id}': referenced by {count} {referenced_by}")]
    ReferencedBy {
        entity: &'static str,
        id: String,
        referenced_by: &'static str,
        count: usize,
    },

    /// An export was requested with no records to export.
    #[error("nothing to export")]
    EmptyExport,

    /// Local snapshot file could not be read or written.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Local snapshot file could not be encoded or decoded.
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
