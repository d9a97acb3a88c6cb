//! Unified error types and result handling.

use thiserror::Error;

/// Message shown to a visitor when a quote could not be stored.
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "There was an error submitting your quote. Please try again.";

/// Every failure the service can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Shop configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A submitted form broke one or more field rules
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// No product with this slug (or ID)
    #[error("Product not found: {slug}")]
    ProductNotFound {
        /// Slug or ID that was looked up
        slug: String,
    },

    /// No category with this slug, name or ID
    #[error("Category not found: {key}")]
    CategoryNotFound {
        /// Key that was looked up
        key: String,
    },

    /// No client with this ID
    #[error("Client not found: {id}")]
    ClientNotFound {
        /// Client ID
        id: i64,
    },

    /// No quote request with this ID
    #[error("Quote request not found: {id}")]
    QuoteNotFound {
        /// Quote request ID
        id: i64,
    },

    /// Not one of the five status names
    #[error("Invalid quote status: {value}")]
    InvalidStatus {
        /// Rejected input
        value: String,
    },

    /// Neither `existing` nor `custom`
    #[error("Invalid quote type: {value}")]
    InvalidQuoteType {
        /// Rejected input
        value: String,
    },

    /// A list filter that cannot be parsed
    #[error("Invalid value for filter '{name}': {value}")]
    InvalidFilter {
        /// Query parameter name
        name: &'static str,
        /// Rejected input
        value: String,
    },

    /// The atomic create sequence did not commit; nothing was persisted.
    #[error("{}", SUBMISSION_FAILED_MESSAGE)]
    SubmissionFailed {
        /// Underlying database failure
        #[source]
        source: sea_orm::DbErr,
    },
}

impl Error {
    /// Whether this error means the requested record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound { .. }
                | Self::CategoryNotFound { .. }
                | Self::ClientNotFound { .. }
                | Self::QuoteNotFound { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
