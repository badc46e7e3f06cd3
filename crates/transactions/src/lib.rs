//! Transaction log: append-only add/issue history and the reports derived
//! from it.

pub mod log;
pub mod record;
pub mod report;

pub use log::{InMemoryLog, LogStorage, TransactionLog};
pub use record::{Action, PartSnapshot, TransactionRecord};
pub use report::{TopIssued, TopIssuedReport, top_issued};
