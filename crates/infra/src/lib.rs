//! Infrastructure layer: flat-file storage and configuration.

pub mod catalog_file;
pub mod config;
pub mod csv_table;
pub mod log_file;

pub use catalog_file::CsvCatalogFile;
pub use config::{ConfigError, StockroomConfig};
pub use log_file::CsvLogFile;
