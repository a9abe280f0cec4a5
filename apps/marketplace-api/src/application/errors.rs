//! Application-level error.
//!
//! Every use case returns [`ServiceError`]; the HTTP layer maps it onto a
//! status code in [`crate::error`].

use thiserror::Error;

use crate::application::ports::{AuthError, StoreError};
use crate::domain::catalog::CatalogError;
use crate::domain::identity::AccessError;
use crate::domain::ordering::OrderError;
use crate::domain::shared::DomainError;

/// Error returned by application use cases.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Authentication failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Authenticated but not allowed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Order placement or lifecycle rule violated.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Catalog rule violated.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Storage failed; the unit of work, if any, was rolled back.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// Request failed validation before reaching the domain.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl ServiceError {
    /// Whether the caller may retry the same request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Persistence(err) => err.is_retryable(),
            _ => false,
        }
    }
}
