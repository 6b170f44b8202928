//! Error types for the issuer's account/card/authorization core.

use thiserror::Error;

/// Result type for issuer operations.
pub type Result<T> = std::result::Result<T, IssuerError>;

/// Errors surfaced by the repository and authorization core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssuerError {
    /// A repository lookup found nothing matching.
    #[error("not found")]
    NotFound,

    /// `Account::hold` rejected a hold because available balance is too low.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Anything unexpected; the ISO 8583 handler maps this to approval code 99.
    #[error("internal error: {0}")]
    Internal(String),
}
