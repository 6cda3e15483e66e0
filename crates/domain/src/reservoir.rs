//! Reservoir ledger: the shared water supply and its per-size price table.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::order::{DrinkSize, OrderError, Volume};

/// Volume consumed by one drink of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkSizeVolume {
    pub size: DrinkSize,
    pub volume: Volume,
}

impl DrinkSizeVolume {
    pub fn new(size: DrinkSize, volume: Volume) -> Self {
        Self { size, volume }
    }
}

/// The dispenser's singleton settings record.
///
/// `remaining` can only decrease, and only through [`ReservoirSettings::try_debit`]
/// or an explicit [`ReservoirSettings::debit`] after a capacity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservoirSettings {
    remaining: Volume,
    drink_sizes: Vec<DrinkSizeVolume>,
    #[serde(default)]
    allowed_types: Vec<String>,
}

impl ReservoirSettings {
    /// Creates a settings record.
    ///
    /// An empty `allowed_types` list places no restriction on beverage types.
    pub fn new(
        remaining: Volume,
        drink_sizes: Vec<DrinkSizeVolume>,
        allowed_types: Vec<String>,
    ) -> Self {
        Self {
            remaining,
            drink_sizes,
            allowed_types,
        }
    }

    /// Default size table: 100 / 250 / 400.
    pub fn default_drink_sizes() -> Vec<DrinkSizeVolume> {
        vec![
            DrinkSizeVolume::new(DrinkSize::Small, Volume::new(100)),
            DrinkSizeVolume::new(DrinkSize::Medium, Volume::new(250)),
            DrinkSizeVolume::new(DrinkSize::Large, Volume::new(400)),
        ]
    }

    pub fn remaining(&self) -> Volume {
        self.remaining
    }

    pub fn drink_sizes(&self) -> &[DrinkSizeVolume] {
        &self.drink_sizes
    }

    pub fn allowed_types(&self) -> &[String] {
        &self.allowed_types
    }

    /// Returns true if orders may be placed for this beverage type.
    pub fn allows_type(&self, beverage_type: &str) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.iter().any(|t| t == beverage_type)
    }

    /// Looks up the configured volume for a size.
    pub fn volume_for(&self, size: DrinkSize) -> Result<Volume, ConfigurationError> {
        self.drink_sizes
            .iter()
            .find(|entry| entry.size == size)
            .map(|entry| entry.volume)
            .ok_or(ConfigurationError::MissingDrinkSize(size))
    }

    /// Returns true if serving `size` leaves strictly more than zero behind.
    pub fn has_capacity(&self, size: DrinkSize) -> Result<bool, ConfigurationError> {
        let volume = self.volume_for(size)?;
        Ok(self
            .remaining
            .checked_sub(volume)
            .is_some_and(|left| left.is_positive()))
    }

    /// Unconditionally removes `volume` from the reservoir.
    ///
    /// Callers must have checked capacity within the same serialized unit.
    pub fn debit(&mut self, volume: Volume) -> Volume {
        self.remaining = self.remaining - volume;
        self.remaining
    }

    /// Checks capacity and debits in one step.
    ///
    /// Returns the volume taken. On rejection the reservoir is untouched.
    pub fn try_debit(&mut self, size: DrinkSize) -> Result<Volume, OrderError> {
        if !self.has_capacity(size)? {
            return Err(OrderError::InsufficientReservoir);
        }
        let volume = self.volume_for(size)?;
        self.debit(volume);
        Ok(volume)
    }
}
