//! Domain error taxonomy shared by every layer above the store.

use thiserror::Error;

use super::types::ItemId;

/// Closed set of failure kinds for item operations.
///
/// Every store and service operation resolves to exactly one of these on
/// failure; no raw driver error crosses the store boundary. The API layer
/// maps each kind to a status code in its `IntoResponse` impl.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("item with id {0} not found")]
    NotFound(ItemId),
    #[error("item with id {0} has been deleted")]
    AlreadyDeleted(ItemId),
    /// Unexpected storage or infrastructure failure. The cause is kept for
    /// logging; callers outside the process only ever see a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ItemError {
    /// True for the two kinds produced by the tombstone-aware miss
    /// classification in the store.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, ItemError::NotFound(_) | ItemError::AlreadyDeleted(_))
    }
}

impl From<sqlx::Error> for ItemError {
    fn from(err: sqlx::Error) -> Self {
        ItemError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ItemError {
    fn from(err: validator::ValidationErrors) -> Self {
        ItemError::Validation(err.to_string())
    }
}
