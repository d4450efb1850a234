use thiserror::Error;

use crate::types::ResourceKind;

/// Failures reported by a [`Catalog`](crate::spotify::Catalog) implementation.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The requested resource or collection does not exist.
    #[error("resource not found")]
    NotFound,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service asked us to back off longer than we are willing to wait.
    #[error("rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("operation not supported by the catalog: {0}")]
    Unsupported(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Errors raised by the collection and playlist layer.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{kind} with id '{selector}' appears to not exist!")]
    NotFound {
        kind: ResourceKind,
        selector: String,
    },

    #[error(
        "Multiple {kind}s ({matches}) were found with name: '{name}'. Please specify which one with '--id'."
    )]
    AmbiguousSelector {
        kind: ResourceKind,
        name: String,
        matches: usize,
    },

    #[error("Invalid position list: {0}")]
    InvalidPositionSpec(String),

    #[error("Item of type '{0}' not recognized!")]
    UnrecognizedKind(String),

    #[error("Cannot {operation} items of type '{kind}'")]
    Unsupported {
        kind: ResourceKind,
        operation: &'static str,
    },

    #[error("Expected a {expected}, got a {found}")]
    KindMismatch {
        expected: ResourceKind,
        found: ResourceKind,
    },

    #[error("Missing required selector: {0}")]
    MissingSelector(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl LibraryError {
    /// Turns a catalog not-found into a [`LibraryError::NotFound`] naming the selector.
    pub fn from_catalog(err: CatalogError, kind: ResourceKind, selector: &str) -> Self {
        match err {
            CatalogError::NotFound => LibraryError::NotFound {
                kind,
                selector: selector.to_string(),
            },
            other => LibraryError::Catalog(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
