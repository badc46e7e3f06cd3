//! Reports derived from the transaction log.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::record::TransactionRecord;

/// One row of the top-issued summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopIssued {
    pub part_number: String,
    pub part_name: String,
    pub total_issued: u64,
    #[serde(with = "stockroom_core::clock::serde_timestamp")]
    pub last_issued_date: Option<NaiveDateTime>,
}

/// Issued totals grouped by (Part Number, Part Name), in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopIssuedReport {
    rows: Vec<TopIssued>,
}

impl TopIssuedReport {
    pub fn rows(&self) -> &[TopIssued] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TopIssued> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Reorder by total issued, largest first. Ties keep key order.
    pub fn ranked_by_total(mut self) -> Self {
        self.rows.sort_by(|a, b| b.total_issued.cmp(&a.total_issued));
        self
    }
}

/// Aggregate Issue rows by the (Part Number, Part Name) pair.
///
/// The pair is the grouping key: the same number under two spellings of the
/// name yields two rows. Rows without a parseable date still count toward the
/// total but not toward the last-issued date.
pub fn top_issued<'a>(entries: impl IntoIterator<Item = &'a TransactionRecord>) -> TopIssuedReport {
    let mut groups: BTreeMap<(&str, &str), (u64, Option<NaiveDateTime>)> = BTreeMap::new();

    for entry in entries.into_iter().filter(|e| e.action.is_issue()) {
        let slot = groups
            .entry((entry.part_number.as_str(), entry.part_name.as_str()))
            .or_insert((0, None));
        slot.0 = slot.0.saturating_add(entry.quantity.get());
        slot.1 = slot.1.max(entry.date);
    }

    let rows = groups
        .into_iter()
        .map(|((part_number, part_name), (total_issued, last_issued_date))| TopIssued {
            part_number: part_number.to_string(),
            part_name: part_name.to_string(),
            total_issued,
            last_issued_date,
        })
        .collect();

    TopIssuedReport { rows }
}
