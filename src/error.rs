//! Error types
//!
//! Asset loading is the only failure the game surfaces to the player; the
//! rest are reported through the log.

use thiserror::Error;

/// Errors that can occur while bringing the game up
#[derive(Error, Debug)]
pub enum GameError {
    /// A symbol image could not be fetched or decoded
    #[error("failed to load asset '{name}' from {path}: {reason}")]
    AssetLoad {
        /// Catalog name of the symbol
        name: String,
        /// Image path that was requested
        path: String,
        /// Browser-provided failure description
        reason: String,
    },

    /// Machine configuration JSON did not parse
    #[error("invalid machine configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Machine configuration parsed but is unusable
    #[error("invalid symbol catalog: {0}")]
    InvalidCatalog(String),

    /// GPU setup or texture upload failed
    #[error("renderer error: {0}")]
    Renderer(String),
}
