use common::OrderId;
use domain::OrderError;
use thiserror::Error;

/// Errors that can occur when interacting with the dispenser store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another beverage already uses this name.
    #[error("A beverage with the name {name} already exists.")]
    DuplicateBeverageName { name: String },

    /// The order to complete does not exist.
    #[error("No order found with id {0}")]
    OrderNotFound(OrderId),

    /// The admission or queue rules rejected the operation.
    /// Nothing was written.
    #[error(transparent)]
    Rejected(#[from] OrderError),

    /// A write would have put a second order in progress.
    #[error("Another order is already in progress")]
    QueueConflict,

    /// A stored row could not be mapped back to a domain record.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
