//! Value objects for the order domain.

use serde::{Deserialize, Serialize};

/// Cup size of a drink order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrinkSize {
    Small,
    Medium,
    Large,
}

impl DrinkSize {
    /// Returns the size name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DrinkSize::Small => "Small",
            DrinkSize::Medium => "Medium",
            DrinkSize::Large => "Large",
        }
    }
}

impl std::fmt::Display for DrinkSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown drink size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a valid drink size")]
pub struct UnknownDrinkSize(pub String);

impl std::str::FromStr for DrinkSize {
    type Err = UnknownDrinkSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Small" => Ok(DrinkSize::Small),
            "Medium" => Ok(DrinkSize::Medium),
            "Large" => Ok(DrinkSize::Large),
            other => Err(UnknownDrinkSize(other.to_string())),
        }
    }
}

/// Amount of water, in the reservoir's own unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(i64);

impl Volume {
    /// Creates a volume from a raw amount.
    pub fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Returns zero volume.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the raw amount.
    pub fn amount(&self) -> i64 {
        self.0
    }

    /// Returns true if the volume is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Subtracts another volume, returning None on overflow.
    pub fn checked_sub(&self, other: Volume) -> Option<Volume> {
        self.0.checked_sub(other.0).map(Volume)
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add for Volume {
    type Output = Volume;

    fn add(self, rhs: Self) -> Self::Output {
        Volume(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Volume {
    type Output = Volume;

    fn sub(self, rhs: Self) -> Self::Output {
        Volume(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Volume {
    fn sum<I: Iterator<Item = Volume>>(iter: I) -> Self {
        iter.fold(Volume::zero(), |acc, v| acc + v)
    }
}
