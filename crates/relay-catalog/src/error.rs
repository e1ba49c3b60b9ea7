//! Error types for loading relay catalogs.

use thiserror::Error;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the relay list failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The relay list is not valid JSON or does not match the catalog shape
    #[error("invalid relay list: {0}")]
    Json(#[from] serde_json::Error),

    /// A relay public key is not 32 bytes of base64
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}
