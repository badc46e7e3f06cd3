//! Error model shared by the catalog and the transaction log.

use thiserror::Error;

/// Result type used across the data layer.
pub type StockroomResult<T> = Result<T, StockroomError>;

/// Data-layer error.
///
/// Every variant is recoverable by the caller; none of them should bring the
/// process down.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockroomError {
    /// An input failed validation (non-numeric or out-of-range quantity, etc.).
    #[error("validation failed: {0}")]
    Validation(String),

    /// No part matched the requested key.
    #[error("part not found: {0}")]
    NotFound(String),

    /// An issue asked for more than the current stock.
    #[error("insufficient stock for {part_number}: requested {requested}, available {available}")]
    InsufficientStock {
        part_number: String,
        requested: u64,
        available: u64,
    },

    /// Reading or writing durable state failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl StockroomError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn insufficient_stock(part_number: impl Into<String>, requested: u64, available: u64) -> Self {
        Self::InsufficientStock {
            part_number: part_number.into(),
            requested,
            available,
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<std::io::Error> for StockroomError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
