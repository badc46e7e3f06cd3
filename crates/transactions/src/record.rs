use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockroom_core::Quantity;

/// Kind of stock movement.
///
/// `Other` holds a label this crate does not produce, found in a log written
/// by another tool. Such rows are carried through rewrites unchanged and
/// ignored by reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Add,
    Issue,
    Other(String),
}

impl Action {
    /// Value stored in the log's `Action` column.
    pub fn as_str(&self) -> &str {
        match self {
            Action::Add => "Add",
            Action::Issue => "Issue",
            Action::Other(label) => label,
        }
    }

    /// Classify a stored label. Matching is exact after trimming.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Add" => Action::Add,
            "Issue" => Action::Issue,
            other => Action::Other(other.to_string()),
        }
    }

    pub fn is_issue(&self) -> bool {
        matches!(self, Action::Issue)
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Action {
    fn from(label: String) -> Self {
        Action::from_label(&label)
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Descriptive fields of a part copied into a log entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSnapshot {
    pub part_number: String,
    pub part_name: String,
    pub machine: String,
    pub note: String,
}

/// One row of the log. Never mutated once appended.
///
/// `quantity` is the delta applied, not the resulting stock level. `date` is
/// `None` only for stored rows whose Date cell could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(with = "stockroom_core::clock::serde_timestamp")]
    pub date: Option<NaiveDateTime>,
    pub action: Action,
    pub part_number: String,
    pub part_name: String,
    pub quantity: Quantity,
    pub machine: String,
    pub note: String,
}

impl TransactionRecord {
    pub fn new(date: NaiveDateTime, action: Action, part: PartSnapshot, quantity: Quantity) -> Self {
        Self {
            date: Some(date),
            action,
            part_number: part.part_number,
            part_name: part.part_name,
            quantity,
            machine: part.machine,
            note: part.note,
        }
    }
}
