//! `stockroom-core`: shared building blocks for the stockroom data layer.
//!
//! This crate contains **pure domain** primitives (no IO, no storage).

pub mod clock;
pub mod error;
pub mod quantity;

pub use clock::{Clock, FixedClock, SystemClock, TIMESTAMP_FORMAT, format_timestamp, parse_timestamp};
pub use error::{StockroomError, StockroomResult};
pub use quantity::Quantity;
