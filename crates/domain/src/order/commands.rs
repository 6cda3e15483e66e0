//! Order commands.

use common::{BeverageId, OrderId};
use thiserror::Error;

use crate::error::{ValidationError, non_blank};

use super::DrinkSize;

/// Raw request to place a drink order, as received from a client.
///
/// Every field is optional here so that missing values surface as
/// validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default)]
pub struct PlaceOrder {
    pub customer: Option<String>,
    pub beverage: Option<String>,
    pub drink_size: Option<String>,
}

/// A validated order request, ready for admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCandidate {
    pub customer: String,
    pub beverage_id: BeverageId,
    pub size: DrinkSize,
}

/// Why a [`PlaceOrder`] request could not become a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceOrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The beverage reference is not a well-formed id.
    #[error("{0} is not a valid beverage ID")]
    InvalidBeverageReference(String),
}

impl PlaceOrder {
    /// Creates a request from already known values.
    pub fn new(
        customer: impl Into<String>,
        beverage_id: BeverageId,
        drink_size: DrinkSize,
    ) -> Self {
        Self {
            customer: Some(customer.into()),
            beverage: Some(beverage_id.to_string()),
            drink_size: Some(drink_size.to_string()),
        }
    }

    /// Checks required fields and parses the beverage reference and size.
    pub fn validate(self) -> Result<OrderCandidate, PlaceOrderError> {
        let mut errors = ValidationError::new();

        let customer = non_blank(self.customer);
        if customer.is_none() {
            errors.push("customer", "Customer is required");
        }

        let beverage = non_blank(self.beverage);
        if beverage.is_none() {
            errors.push("beverage", "A beverage id is required");
        }

        let size = match non_blank(self.drink_size) {
            None => {
                errors.push("drinkSize", "Order size is required");
                None
            }
            Some(raw) => match raw.parse::<DrinkSize>() {
                Ok(size) => Some(size),
                Err(e) => {
                    errors.push("drinkSize", e.to_string());
                    None
                }
            },
        };

        let (Some(customer), Some(beverage), Some(size)) = (customer, beverage, size) else {
            return Err(errors.into());
        };

        let beverage_id = BeverageId::parse(&beverage)
            .map_err(|_| PlaceOrderError::InvalidBeverageReference(beverage))?;

        Ok(OrderCandidate {
            customer,
            beverage_id,
            size,
        })
    }
}

/// Command to mark the order at the dispenser as served.
#[derive(Debug, Clone, Copy)]
pub struct CompleteOrder {
    pub order_id: OrderId,
}

impl CompleteOrder {
    /// Creates a new CompleteOrder command.
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request_becomes_candidate() {
        let beverage_id = BeverageId::new();
        let candidate = PlaceOrder::new("John", beverage_id, DrinkSize::Medium)
            .validate()
            .unwrap();
        assert_eq!(candidate.customer, "John");
        assert_eq!(candidate.beverage_id, beverage_id);
        assert_eq!(candidate.size, DrinkSize::Medium);
    }

    #[test]
    fn test_missing_size_is_reported() {
        let req = PlaceOrder {
            customer: Some("John".into()),
            beverage: Some(BeverageId::new().to_string()),
            drink_size: None,
        };
        let err = req.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "ValidationError: drinkSize: Order size is required"
        );
    }

    #[test]
    fn test_unknown_size_is_reported() {
        let req = PlaceOrder {
            customer: Some("John".into()),
            beverage: Some(BeverageId::new().to_string()),
            drink_size: Some("Huge".into()),
        };
        assert!(matches!(
            req.validate(),
            Err(PlaceOrderError::Validation(_))
        ));
    }

    #[test]
    fn test_all_missing_fields_are_collected() {
        let err = PlaceOrder::default().validate().unwrap_err();
        let PlaceOrderError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["customer", "beverage", "drinkSize"]);
    }

    #[test]
    fn test_malformed_beverage_reference() {
        let req = PlaceOrder {
            customer: Some("John".into()),
            beverage: Some("InvalidId".into()),
            drink_size: Some("Medium".into()),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "InvalidId is not a valid beverage ID");
    }
}
