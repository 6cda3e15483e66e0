//! Domain error types shared across the catalog, ledger and queue.

use thiserror::Error;

use crate::order::DrinkSize;

/// The dispenser is missing configuration it needs to price an order.
///
/// This is never the caller's fault and is reported as a server error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No reservoir settings record has been provisioned.
    #[error("Reservoir settings have not been configured")]
    MissingSettings,

    /// The size table has no entry for a drink size.
    #[error("No reservoir volume is configured for drink size {0}")]
    MissingDrinkSize(DrinkSize),
}

/// A single invalid or missing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// One or more fields of a request failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("ValidationError: {}", describe(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// Creates an empty error collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field failure.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Creates an error for a single field.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.push(field, message);
        err
    }

    /// Returns the recorded field failures.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts the collector into a result.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| format!("{}: {}", err.field, err.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the trimmed value if present and non-blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
