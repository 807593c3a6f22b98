//! Unified error types and result handling.
//!
//! Every core operation returns [`Result`]. Validation failures carry a
//! human-readable detail string; the calling layer maps variants to
//! transport-specific responses.

use thiserror::Error;

/// Crate-wide error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad billing day, unresolvable timezone, or malformed configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong with the configuration
        message: String,
    },

    /// Unsupported or malformed currency code.
    #[error("invalid currency: {message}")]
    InvalidCurrency {
        /// What was wrong with the currency code
        message: String,
    },

    /// Non-positive or otherwise unusable amount.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: rust_decimal::Decimal,
    },

    /// Referenced entity absent or not visible in the requested wallet scope.
    #[error("{entity} not found")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "category", "transaction")
        entity: &'static str,
    },

    /// Operation rejected because it would violate a state invariant
    /// (double refund, delete with refunds, hard delete while referenced).
    #[error("conflict: {message}")]
    Conflict {
        /// Why the operation was rejected
        message: String,
    },

    /// Database error from the persistence layer.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (config file reads).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
