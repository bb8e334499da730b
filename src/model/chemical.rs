use crate::model::{instant, RecordId};
use chrono::{DateTime, Utc};
use std::fmt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Volume unit a chemical is stocked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Ml,
    L,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Ml => f.write_str("ML"),
            Unit::L => f.write_str("L"),
        }
    }
}

/// A stocked chemical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chemical {
    #[serde(default, skip_serializing_if = "RecordId::is_unsaved")]
    pub id: RecordId,

    pub name: String,

    #[serde(default)]
    pub chemical_formula: String,

    /// On-hand amount, in `unit`
    pub quantity: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    /// Instant the chemical expires; bare dates are UTC midnight
    #[serde(default, with = "instant", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,

    /// Reorder threshold; `None` disables the low-stock flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<Decimal>,
}
