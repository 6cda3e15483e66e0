//! Service error types.

use common::{BeverageId, OrderId};
use domain::{OrderError, PlaceOrderError, ValidationError};
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during dispenser operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request fields were missing or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Beverage not found.
    #[error("No beverage found with that id")]
    BeverageNotFound(BeverageId),

    /// An order named a beverage that is not in the catalog.
    #[error("{0} is not a valid beverage ID")]
    InvalidBeverageReference(String),

    /// Order not found.
    #[error("No order found with id {0}")]
    OrderNotFound(OrderId),

    /// An admission or queue rule rejected the request.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Another beverage already uses this name.
    #[error("A beverage with the name {name} already exists.")]
    DuplicateBeverageName { name: String },

    /// Storage failed.
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl ServiceError {
    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::BeverageNotFound(_) => "beverage_not_found",
            Self::InvalidBeverageReference(_) => "invalid_beverage",
            Self::OrderNotFound(_) => "order_not_found",
            Self::Order(e) => e.reason(),
            Self::DuplicateBeverageName { .. } => "duplicate_beverage",
            Self::Store(_) => "storage",
        }
    }

    /// Returns true for failures that are not the caller's fault.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Order(OrderError::Configuration(_))
        )
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateBeverageName { name } => Self::DuplicateBeverageName { name },
            StoreError::OrderNotFound(id) => Self::OrderNotFound(id),
            StoreError::Rejected(e) => Self::Order(e),
            other => Self::Store(other),
        }
    }
}

impl From<PlaceOrderError> for ServiceError {
    fn from(e: PlaceOrderError) -> Self {
        match e {
            PlaceOrderError::Validation(e) => Self::Validation(e),
            PlaceOrderError::InvalidBeverageReference(raw) => Self::InvalidBeverageReference(raw),
        }
    }
}

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use domain::{ConfigurationError, DrinkSize};

    use super::*;

    #[test]
    fn store_rejections_become_order_errors() {
        let err: ServiceError = StoreError::Rejected(OrderError::InsufficientReservoir).into();
        assert!(matches!(err, ServiceError::Order(OrderError::InsufficientReservoir)));
        assert_eq!(
            err.to_string(),
            "Not enough water in the reservoir for your order"
        );
        assert!(!err.is_internal());
    }

    #[test]
    fn store_duplicates_keep_their_message() {
        let err: ServiceError = StoreError::DuplicateBeverageName {
            name: "Green Tea".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "A beverage with the name Green Tea already exists."
        );
        assert_eq!(err.reason(), "duplicate_beverage");
    }

    #[test]
    fn missing_drink_size_is_internal() {
        let err: ServiceError =
            OrderError::Configuration(ConfigurationError::MissingDrinkSize(DrinkSize::Large))
                .into();
        assert!(err.is_internal());
        assert_eq!(err.reason(), "configuration");
    }

    #[test]
    fn other_store_failures_are_internal() {
        let err: ServiceError = StoreError::QueueConflict.into();
        assert!(matches!(err, ServiceError::Store(_)));
        assert!(err.is_internal());
    }

    #[test]
    fn invalid_beverage_reference_message() {
        let err: ServiceError =
            PlaceOrderError::InvalidBeverageReference("abc".to_string()).into();
        assert_eq!(err.to_string(), "abc is not a valid beverage ID");
    }
}
