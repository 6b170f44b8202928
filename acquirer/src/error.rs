//! Error types for payment orchestration.

use thiserror::Error;

/// Result type for acquirer operations.
pub type Result<T> = std::result::Result<T, AcquirerError>;

/// Errors surfaced by the repository and payment orchestrator.
#[derive(Error, Debug)]
pub enum AcquirerError {
    /// A repository lookup found nothing matching.
    #[error("not found")]
    NotFound,

    /// The ISO 8583 round-trip to the issuer failed: malformed reply,
    /// closed connection, or no reply within the send timeout.
    #[error("authorizing payment: {0}")]
    Authorization(#[from] iso8583::Iso8583Error),

    /// Anything unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}
