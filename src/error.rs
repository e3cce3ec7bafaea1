//! Error types shared by the store, the ingestion pipeline and the snapshot layer.
//!
//! Every failure is scoped to the operation that produced it. `NotFound`
//! variants never mutate state; source failures abort the current ingestion
//! run but keep whatever earlier pages already merged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Author not found: {0}")]
    AuthorNotFound(u64),

    #[error("Paper not found: {0}")]
    PaperNotFound(String),

    #[error("Invalid paper {0}: {1}")]
    InvalidPaper(String, String),

    #[error("Bibliographic source unavailable: {0}")]
    SourceUnavailable(#[source] reqwest::Error),

    #[error("Malformed feed from bibliographic source: {0}")]
    SourceParseError(String),

    #[error("Download of paper {paper_id} failed: {reason}")]
    DownloadFailure { paper_id: String, reason: String },

    #[error("Ingestion cancelled after {pages_fetched} page(s)")]
    Cancelled { pages_fetched: usize },

    #[error("Snapshot IO error: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GraphError {
    /// True for the `NotFound` family (author or paper id absent).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::AuthorNotFound(_) | GraphError::PaperNotFound(_)
        )
    }
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
