//! Error types for the `corpus-rag` crate.

use thiserror::Error;

/// Errors that can occur during corpus ingestion and retrieval.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// An error occurred in the similarity index backend.
    #[error("Index error ({backend}): {message}")]
    Index {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A document source could not be read or parsed.
    #[error("Document error: {0}")]
    Document(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error occurred while populating a collection.
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// A query response violated the index contract.
    #[error("Search error: {0}")]
    Search(String),

    /// A caller passed an argument that violates an API precondition.
    ///
    /// These indicate bugs in the calling code (empty query text, zero
    /// `top_k`, misaligned batch arrays) and are never silently defaulted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A convenience result type for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;
