//! Stock quantities.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StockroomError, StockroomResult};

/// A non-negative count of parts.
///
/// Used both for stock levels (`Quantity`, `Min Stock`) and for the deltas
/// applied by add/issue operations.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Strictly parse user input.
    ///
    /// Accepts an optionally signed integer surrounded by whitespace. Blank,
    /// fractional, non-numeric and negative inputs are validation failures.
    pub fn parse(raw: &str) -> StockroomResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StockroomError::validation("quantity is required"));
        }

        let value: i128 = trimmed
            .parse()
            .map_err(|_| StockroomError::validation(format!("quantity must be a whole number, got '{trimmed}'")))?;

        Self::try_from(value)
    }

    /// Parse an optional threshold (e.g. Min Stock) from user input.
    ///
    /// Blank input means "no threshold configured" and yields `None`.
    pub fn parse_optional(raw: &str) -> StockroomResult<Option<Self>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(raw).map(Some)
    }

    /// Lenient numeric accessor for stored cells.
    ///
    /// Spreadsheet exports often carry whole numbers as `5.0`; those are
    /// accepted. Anything blank, fractional, negative or non-numeric is "not a
    /// number" and yields `None` rather than an error.
    pub fn from_cell(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(v) = trimmed.parse::<u64>() {
            return Some(Self(v));
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Some(Self(v as u64)),
            _ => None,
        }
    }

    /// Require a strictly positive amount (issue quantities).
    pub fn ensure_positive(self) -> StockroomResult<Self> {
        if self.is_zero() {
            return Err(StockroomError::validation("quantity must be greater than zero"));
        }
        Ok(self)
    }

    pub fn checked_add(self, other: Quantity) -> StockroomResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| StockroomError::validation("quantity overflow"))
    }

    pub fn checked_sub(self, other: Quantity) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl TryFrom<i128> for Quantity {
    type Error = StockroomError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(StockroomError::validation("quantity cannot be negative"));
        }
        u64::try_from(value)
            .map(Self)
            .map_err(|_| StockroomError::validation("quantity is too large"))
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for Quantity {
    type Err = StockroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
