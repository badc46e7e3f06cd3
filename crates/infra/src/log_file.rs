//! CSV-backed transaction log.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stockroom_core::{Quantity, StockroomError, StockroomResult, format_timestamp, parse_timestamp};
use stockroom_transactions::{Action, LogStorage, TransactionRecord};

use crate::csv_table;

/// Column set of the log table, in file order.
pub const LOG_COLUMNS: [&str; 7] = [
    "Date",
    "Action",
    "Part Number",
    "Part Name",
    "Quantity",
    "Machine",
    "Note",
];

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct LogRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Action")]
    action: String,
    #[serde(rename = "Part Number")]
    part_number: String,
    #[serde(rename = "Part Name")]
    part_name: String,
    #[serde(rename = "Quantity")]
    quantity: String,
    #[serde(rename = "Machine")]
    machine: String,
    #[serde(rename = "Note")]
    note: String,
}

impl LogRow {
    /// Convert a stored row; `line` is the 1-based data row for messages.
    ///
    /// An unreadable Date is kept as "unknown" and an unrecognized Action is
    /// kept verbatim. A non-numeric Quantity makes the log unreadable:
    /// rewriting it would otherwise silently drop history.
    fn into_record(self, line: usize) -> StockroomResult<TransactionRecord> {
        let action = Action::from_label(&self.action);
        let quantity = Quantity::from_cell(&self.quantity).ok_or_else(|| {
            StockroomError::storage(format!("log row {line}: invalid quantity '{}'", self.quantity))
        })?;

        Ok(TransactionRecord {
            date: parse_timestamp(&self.date),
            action,
            part_number: self.part_number,
            part_name: self.part_name,
            quantity,
            machine: self.machine,
            note: self.note,
        })
    }
}

impl From<&TransactionRecord> for LogRow {
    fn from(record: &TransactionRecord) -> Self {
        LogRow {
            date: record.date.map(format_timestamp).unwrap_or_default(),
            action: record.action.as_str().to_string(),
            part_number: record.part_number.clone(),
            part_name: record.part_name.clone(),
            quantity: record.quantity.to_string(),
            machine: record.machine.clone(),
            note: record.note.clone(),
        }
    }
}

/// Log stored as a single CSV file, rewritten on every append.
#[derive(Debug, Clone)]
pub struct CsvLogFile {
    path: PathBuf,
}

impl CsvLogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogStorage for CsvLogFile {
    fn load(&self) -> StockroomResult<Vec<TransactionRecord>> {
        let rows: Vec<LogRow> = csv_table::read_rows(&self.path)?;
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| row.into_record(i + 1))
            .collect()
    }

    fn save(&self, entries: &[TransactionRecord]) -> StockroomResult<()> {
        let rows: Vec<LogRow> = entries.iter().map(LogRow::from).collect();
        csv_table::write_rows(&self.path, &LOG_COLUMNS, &rows)
    }
}
