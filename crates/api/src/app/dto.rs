use serde::{Deserialize, Serialize};

use stockroom_core::{Quantity, StockroomError, StockroomResult};
use stockroom_inventory::{NewPart, PartRecord};
use stockroom_transactions::TransactionRecord;

use crate::app::services::StockMovement;

// -------------------------
// Input helpers
// -------------------------

/// A quantity as submitted by a form or a JSON client.
///
/// Forms send text, scripts send numbers; both go through the same
/// validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl QuantityInput {
    pub fn parse(&self) -> StockroomResult<Quantity> {
        match self {
            QuantityInput::Integer(n) => Quantity::try_from(i128::from(*n)),
            QuantityInput::Float(f) => float_quantity(*f),
            QuantityInput::Text(s) => Quantity::parse(s),
        }
    }

    /// Blank text means "not set".
    pub fn parse_optional(&self) -> StockroomResult<Option<Quantity>> {
        match self {
            QuantityInput::Text(s) => Quantity::parse_optional(s),
            other => other.parse().map(Some),
        }
    }
}

fn float_quantity(value: f64) -> StockroomResult<Quantity> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(StockroomError::validation(format!("quantity must be a whole number, got {value}")));
    }
    // Whole and finite: the cast only saturates for magnitudes outside i128.
    Quantity::try_from(value as i128)
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AddPartRequest {
    pub part_number: String,
    #[serde(default)]
    pub part_name: String,
    pub quantity: QuantityInput,
    #[serde(default)]
    pub min_stock: Option<QuantityInput>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub machine: String,
    #[serde(default)]
    pub note: String,
}

impl AddPartRequest {
    pub fn into_new_part(self) -> StockroomResult<NewPart> {
        let quantity = self.quantity.parse()?;
        let min_stock = match &self.min_stock {
            Some(input) => input.parse_optional()?,
            None => None,
        };
        Ok(NewPart {
            part_number: self.part_number.trim().to_string(),
            part_name: self.part_name.trim().to_string(),
            quantity,
            min_stock,
            unit: self.unit,
            machine: self.machine,
            note: self.note,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub part_number: String,
    pub quantity: QuantityInput,
}

#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    pub part_number: Option<String>,
    pub part_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopIssuedOrder {
    #[default]
    Key,
    Total,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopIssuedQuery {
    #[serde(default)]
    pub order: TopIssuedOrder,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: &'static str,
}

/// A catalog row plus its derived low-stock flag.
#[derive(Debug, Serialize)]
pub struct PartView {
    #[serde(flatten)]
    pub part: PartRecord,
    pub low_stock: Option<bool>,
}

impl From<PartRecord> for PartView {
    fn from(part: PartRecord) -> Self {
        let low_stock = part.is_low_stock();
        Self { part, low_stock }
    }
}

pub fn part_views(parts: Vec<PartRecord>) -> Vec<PartView> {
    parts.into_iter().map(PartView::from).collect()
}

#[derive(Debug, Serialize)]
pub struct MovementResponse {
    pub part: PartView,
    pub transaction: TransactionRecord,
}

impl From<StockMovement> for MovementResponse {
    fn from(movement: StockMovement) -> Self {
        Self {
            part: movement.part.into(),
            transaction: movement.transaction,
        }
    }
}
