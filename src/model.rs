//! Typed inventory resources as the REST API serialises them.
//!
//! Every struct uses camelCase field names on the wire. Quantities are
//! [`rust_decimal::Decimal`] so threshold comparisons stay exact. Calendar
//! fields are [`chrono::NaiveDate`] (the backend stores plain dates with no
//! zone), except chemical expiry, which is an instant read with the same
//! rules as the stock status evaluator.

mod chemical;
mod equipment;
mod id;
mod supplier;
mod transaction;

pub use chemical::{Chemical, Unit};
pub use equipment::{Equipment, EquipmentStatus};
pub use id::RecordId;
pub use supplier::Supplier;
pub use transaction::{InventoryTransaction, ResourceRef, TransactionType};

/// Serde helpers for date fields that arrive with trailing time components.
pub(crate) mod date_prefix {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Deserialize an optional date, reading only the leading `YYYY-MM-DD`.
    ///
    /// The transaction form posts full ISO timestamps
    /// (`2024-03-01T09:30:00.000Z`) while the backend stores a date, so
    /// anything after the tenth character is ignored. Empty strings and
    /// `null` map to `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let prefix = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&raw), &"a YYYY-MM-DD date"))
    }

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }
}

/// Serde helpers for expiry fields, read with the evaluator's date rules.
///
/// Accepts whatever [`crate::record::parse_instant`] accepts and rejects
/// the rest, so a typed chemical and its raw record always agree on when
/// it expires.
pub(crate) mod instant {
    use crate::record::parse_instant;
    use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        parse_instant(trimmed).map(Some).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Str(&raw), &"an ISO 8601 date or date-time")
        })
    }

    /// Midnight instants go back out as plain dates
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) if instant.time() == NaiveTime::MIN => {
                serializer.serialize_str(&instant.format("%Y-%m-%d").to_string())
            }
            Some(instant) => {
                serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            None => serializer.serialize_none(),
        }
    }
}
