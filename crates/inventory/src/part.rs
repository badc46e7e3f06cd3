use serde::{Deserialize, Serialize};

use stockroom_core::Quantity;

/// One row of the catalog.
///
/// `quantity` is `None` only when a stored row carries a blank or non-numeric
/// cell; every row written by the store itself has a numeric quantity.
/// `min_stock` is `None` when no reorder threshold is configured, which is not
/// the same thing as a threshold of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    pub part_number: String,
    pub part_name: String,
    pub quantity: Option<Quantity>,
    pub min_stock: Option<Quantity>,
    pub unit: String,
    pub machine: String,
    pub note: String,
}

impl PartRecord {
    /// Derived "low stock" flag.
    ///
    /// `None` when either side is not a number: such rows are not comparable.
    pub fn is_low_stock(&self) -> Option<bool> {
        match (self.quantity, self.min_stock) {
            (Some(quantity), Some(min)) => Some(quantity < min),
            _ => None,
        }
    }

    /// Current stock, reading a non-numeric cell as empty.
    pub fn available(&self) -> Quantity {
        self.quantity.unwrap_or(Quantity::ZERO)
    }

    /// Case-insensitive substring match on Part Number, Part Name or Machine.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_keyword(&self, needle: &str) -> bool {
        [&self.part_number, &self.part_name, &self.machine]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    pub fn autofill_entry(&self) -> AutofillEntry {
        AutofillEntry {
            part_number: self.part_number.clone(),
            part_name: self.part_name.clone(),
            unit: self.unit.clone(),
            machine: self.machine.clone(),
            note: self.note.clone(),
            min_stock: self.min_stock,
        }
    }
}

/// Input for an add/restock.
///
/// All descriptive fields are used verbatim when the part is new; for an
/// existing part only `quantity` is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPart {
    pub part_number: String,
    pub part_name: String,
    pub quantity: Quantity,
    pub min_stock: Option<Quantity>,
    pub unit: String,
    pub machine: String,
    pub note: String,
}

impl NewPart {
    pub(crate) fn into_record(self) -> PartRecord {
        PartRecord {
            part_number: self.part_number,
            part_name: self.part_name,
            quantity: Some(self.quantity),
            min_stock: self.min_stock,
            unit: self.unit,
            machine: self.machine,
            note: self.note,
        }
    }
}

/// Descriptive template of a part, used to prefill entry forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AutofillEntry {
    pub part_number: String,
    pub part_name: String,
    pub unit: String,
    pub machine: String,
    pub note: String,
    pub min_stock: Option<Quantity>,
}
