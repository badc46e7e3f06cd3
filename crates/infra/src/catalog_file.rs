//! CSV-backed part catalog.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stockroom_core::{Quantity, StockroomResult};
use stockroom_inventory::{CatalogStorage, PartRecord};

use crate::csv_table;

/// Column set of the catalog table, in file order.
pub const CATALOG_COLUMNS: [&str; 7] = [
    "Part Number",
    "Part Name",
    "Quantity",
    "Min Stock",
    "Unit",
    "Machine",
    "Note",
];

/// One catalog row exactly as stored: every cell is text.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct CatalogRow {
    #[serde(rename = "Part Number")]
    part_number: String,
    #[serde(rename = "Part Name")]
    part_name: String,
    #[serde(rename = "Quantity")]
    quantity: String,
    #[serde(rename = "Min Stock")]
    min_stock: String,
    #[serde(rename = "Unit")]
    unit: String,
    #[serde(rename = "Machine")]
    machine: String,
    #[serde(rename = "Note")]
    note: String,
}

impl From<CatalogRow> for PartRecord {
    fn from(row: CatalogRow) -> Self {
        PartRecord {
            part_number: row.part_number,
            part_name: row.part_name,
            quantity: Quantity::from_cell(&row.quantity),
            min_stock: Quantity::from_cell(&row.min_stock),
            unit: row.unit,
            machine: row.machine,
            note: row.note,
        }
    }
}

impl From<&PartRecord> for CatalogRow {
    fn from(part: &PartRecord) -> Self {
        CatalogRow {
            part_number: part.part_number.clone(),
            part_name: part.part_name.clone(),
            quantity: cell(part.quantity),
            min_stock: cell(part.min_stock),
            unit: part.unit.clone(),
            machine: part.machine.clone(),
            note: part.note.clone(),
        }
    }
}

fn cell(value: Option<Quantity>) -> String {
    value.map(|q| q.to_string()).unwrap_or_default()
}

/// Catalog stored as a single CSV file, rewritten on every save.
#[derive(Debug, Clone)]
pub struct CsvCatalogFile {
    path: PathBuf,
}

impl CsvCatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStorage for CsvCatalogFile {
    fn load(&self) -> StockroomResult<Vec<PartRecord>> {
        let rows: Vec<CatalogRow> = csv_table::read_rows(&self.path)?;
        Ok(rows.into_iter().map(PartRecord::from).collect())
    }

    fn save(&self, parts: &[PartRecord]) -> StockroomResult<()> {
        let rows: Vec<CatalogRow> = parts.iter().map(CatalogRow::from).collect();
        csv_table::write_rows(&self.path, &CATALOG_COLUMNS, &rows)
    }
}
