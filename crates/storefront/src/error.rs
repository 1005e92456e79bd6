//! Unified error handling.
//!
//! Each module has its own error type; `AppError` wraps them for callers
//! such as the CLI that drive several modules at once.

use click_me_core::{CategoryError, ProductId};
use thiserror::Error;

use crate::config::ConfigError;
use crate::contact::SubmitError;
use crate::query::QueryError;
use crate::reviews::ReviewError;
use crate::storage::StorageError;
use crate::validation::FormErrors;

/// Application-level error type for the storefront.
///
/// `SubmitError` is flattened into `Validation` or `Storage`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persisting state failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Contact form failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] FormErrors),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid category: {0}")]
    Category(#[from] CategoryError),

    /// No product with this id.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(errors) => Self::Validation(errors),
            SubmitError::Storage(err) => Self::Storage(err),
        }
    }
}

impl AppError {
    /// Whether the error was caused by user input rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Query(_)
                | Self::Review(_)
                | Self::Category(_)
                | Self::ProductNotFound(_)
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
