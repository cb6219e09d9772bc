//! Error types.

use crate::store::Collection;

/// Why a message could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The message is empty or only whitespace.
    #[error("message is empty")]
    EmptyMessage,
}

/// Failures reported by a [`Store`](crate::store::Store) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no {collection} record with id {id}")]
    NotFound { collection: Collection, id: String },

    #[error("invalid routine: {0}")]
    InvalidRoutine(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid store data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by a [`Notifier`](crate::reminder::Notifier).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("notification permission not granted")]
    PermissionDenied,

    #[error("notification could not be delivered: {0}")]
    Delivery(String),
}
