//! Beverage catalog records.

use common::BeverageId;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, non_blank};

/// A beverage the dispenser can prepare.
///
/// `name` is unique across the catalog; the store enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beverage {
    pub id: BeverageId,
    pub name: String,
    /// Category checked against the reservoir's allow-list, e.g. "Tea".
    pub beverage_type: String,
    /// Serving temperature.
    pub temperature: f64,
    pub garnish: Option<String>,
}

/// Request to add a beverage to the catalog.
#[derive(Debug, Clone, Default)]
pub struct NewBeverage {
    pub name: Option<String>,
    pub beverage_type: Option<String>,
    pub temperature: Option<f64>,
    pub garnish: Option<String>,
}

impl NewBeverage {
    /// Validates required fields and assigns a fresh id.
    pub fn validate(self) -> Result<Beverage, ValidationError> {
        let mut errors = ValidationError::new();

        let name = non_blank(self.name);
        if name.is_none() {
            errors.push("name", "Beverage name is required");
        }

        let beverage_type = non_blank(self.beverage_type);
        if beverage_type.is_none() {
            errors.push("type", "Beverage type is required");
        }

        match self.temperature {
            None => errors.push("temperature", "Beverage temperature is required"),
            Some(t) if !t.is_finite() => {
                errors.push("temperature", format!("{t} is not a valid number"))
            }
            Some(_) => {}
        }

        let (Some(name), Some(beverage_type), Some(temperature)) =
            (name, beverage_type, self.temperature)
        else {
            return Err(errors);
        };
        errors.into_result()?;

        Ok(Beverage {
            id: BeverageId::new(),
            name,
            beverage_type,
            temperature,
            garnish: non_blank(self.garnish),
        })
    }
}

/// Partial update of a catalog entry. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BeveragePatch {
    pub name: Option<String>,
    pub beverage_type: Option<String>,
    pub temperature: Option<f64>,
    pub garnish: Option<String>,
}

impl BeveragePatch {
    /// Applies the patch to a copy of `beverage`.
    pub fn apply(&self, beverage: &Beverage) -> Result<Beverage, ValidationError> {
        let mut errors = ValidationError::new();
        let mut updated = beverage.clone();

        if let Some(name) = &self.name {
            match non_blank(Some(name.clone())) {
                Some(name) => updated.name = name,
                None => errors.push("name", "Beverage name is required"),
            }
        }

        if let Some(beverage_type) = &self.beverage_type {
            match non_blank(Some(beverage_type.clone())) {
                Some(t) => updated.beverage_type = t,
                None => errors.push("type", "Beverage type is required"),
            }
        }

        if let Some(t) = self.temperature {
            if t.is_finite() {
                updated.temperature = t;
            } else {
                errors.push("temperature", format!("{t} is not a valid number"));
            }
        }

        if let Some(garnish) = &self.garnish {
            updated.garnish = non_blank(Some(garnish.clone()));
        }

        errors.into_result()?;
        Ok(updated)
    }
}
