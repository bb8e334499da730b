//! Inventory records as seen by the stock status evaluator.
//!
//! [`RawRecord`] is the untouched wire shape returned by the dashboard
//! endpoints. [`InventoryRecord`] is the validated form: the minimal
//! shape shared by chemicals and equipment, tagged with a [`RecordKind`].
//! Source-specific fields never reach the evaluator.

mod error;

pub use error::{MalformedField, MalformedReason, MalformedRecordError};

use crate::model::{Chemical, Equipment, RecordId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Naive date-time layouts accepted for expiry dates, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Which resource a record came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Chemical,
    Equipment,
    #[default]
    Unspecified,
}

/// A record exactly as the REST API returned it.
///
/// Numeric and date fields are kept as JSON values so that validation can
/// report precisely what was wrong instead of failing the whole payload.
/// JSON `null` and an absent key are both `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub id: RecordId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub quantity: Option<Value>,

    #[serde(default)]
    pub min_quantity: Option<Value>,

    #[serde(default)]
    pub expiry_date: Option<Value>,

    /// Source-specific fields, carried but never inspected
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated inventory record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: RecordId,
    pub name: String,
    pub kind: RecordKind,
    pub quantity: Decimal,
    /// Reorder threshold; `None` means the record is never low-stock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<Decimal>,
    /// `None` means the record does not expire
    #[serde(rename = "expiryDate", skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl InventoryRecord {
    /// Validate a raw record.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] naming the record id when `name` is
    /// blank, `quantity` is missing, `quantity` or `minQuantity` is not a
    /// non-negative JSON number, or `expiryDate` is present but not an
    /// ISO 8601 date.
    pub fn parse(raw: &RawRecord, kind: RecordKind) -> Result<Self, MalformedRecordError> {
        let name = raw.name.trim();
        if name.is_empty() {
            return Err(MalformedRecordError::new(
                raw.id.clone(),
                MalformedField::Name,
                MalformedReason::Missing,
            ));
        }
        let quantity = parse_quantity(&raw.id, MalformedField::Quantity, raw.quantity.as_ref())?
            .ok_or_else(|| {
                MalformedRecordError::new(
                    raw.id.clone(),
                    MalformedField::Quantity,
                    MalformedReason::Missing,
                )
            })?;
        let min_quantity =
            parse_quantity(&raw.id, MalformedField::MinQuantity, raw.min_quantity.as_ref())?;
        let expiry = parse_expiry(&raw.id, raw.expiry_date.as_ref())?;

        Ok(Self {
            id: raw.id.clone(),
            name: name.to_string(),
            kind,
            quantity,
            min_quantity,
            expiry,
        })
    }

    /// Strictly below the reorder threshold. Equal is not low.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.min_quantity
            .is_some_and(|threshold| self.quantity < threshold)
    }

    /// Expiry strictly before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry < now)
    }
}

impl From<&Chemical> for InventoryRecord {
    fn from(chemical: &Chemical) -> Self {
        Self {
            id: chemical.id.clone(),
            name: chemical.name.clone(),
            kind: RecordKind::Chemical,
            quantity: chemical.quantity,
            min_quantity: chemical.min_quantity,
            expiry: chemical.expiry_date,
        }
    }
}

impl From<&Equipment> for InventoryRecord {
    fn from(equipment: &Equipment) -> Self {
        Self {
            id: equipment.id.clone(),
            name: equipment.name.clone(),
            kind: RecordKind::Equipment,
            quantity: Decimal::from(equipment.quantity),
            min_quantity: equipment.min_quantity.map(Decimal::from),
            expiry: None,
        }
    }
}

/// Parse an ISO 8601 date or date-time into an instant.
///
/// RFC 3339 values keep their offset. Naive date-times are read as UTC and
/// bare calendar dates as UTC midnight.
#[must_use]
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn parse_quantity(
    id: &RecordId,
    field: MalformedField,
    value: Option<&Value>,
) -> Result<Option<Decimal>, MalformedRecordError> {
    let malformed = |reason| MalformedRecordError::new(id.clone(), field, reason);

    let number = match value {
        None => return Ok(None),
        Some(Value::Number(number)) => number,
        Some(other) => return Err(malformed(MalformedReason::NotANumber(other.to_string()))),
    };

    let parsed = if let Some(int) = number.as_i64() {
        Decimal::from(int)
    } else if let Some(uint) = number.as_u64() {
        Decimal::from(uint)
    } else {
        let float = number.as_f64().unwrap_or(f64::NAN);
        if float < 0.0 {
            return Err(malformed(MalformedReason::Negative));
        }
        // Shortest round-trip text of the float, so 0.1 stays 0.1
        let text = number.to_string();
        match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
            Ok(parsed) => parsed,
            // Fractions finer than 28 places round to the nearest representable value
            Err(_) if float < 1.0 => Decimal::from_f64_retain(float)
                .map(|parsed| parsed.round_dp(Decimal::MAX_SCALE))
                .ok_or_else(|| malformed(MalformedReason::OutOfRange(text.clone())))?,
            Err(_) => return Err(malformed(MalformedReason::OutOfRange(text))),
        }
    };

    if parsed < Decimal::ZERO {
        return Err(malformed(MalformedReason::Negative));
    }
    Ok(Some(parsed))
}

fn parse_expiry(
    id: &RecordId,
    value: Option<&Value>,
) -> Result<Option<DateTime<Utc>>, MalformedRecordError> {
    let malformed = |reason| MalformedRecordError::new(id.clone(), MalformedField::ExpiryDate, reason);

    match value {
        None => Ok(None),
        // Forms submit an empty string for an unset date
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => parse_instant(text.trim())
            .map(Some)
            .ok_or_else(|| malformed(MalformedReason::UnparseableDate(text.clone()))),
        Some(other) => Err(malformed(MalformedReason::UnparseableDate(other.to_string()))),
    }
}
