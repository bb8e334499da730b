//! Error raised when a raw record cannot be interpreted

use crate::model::RecordId;
use std::fmt;

/// Field of a raw record that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedField {
    Name,
    Quantity,
    MinQuantity,
    ExpiryDate,
}

impl MalformedField {
    /// Wire name of the field
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedField::Name => "name",
            MalformedField::Quantity => "quantity",
            MalformedField::MinQuantity => "minQuantity",
            MalformedField::ExpiryDate => "expiryDate",
        }
    }
}

impl fmt::Display for MalformedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Required field absent or `null`
    Missing,
    /// Not a JSON number (the offending value is kept in JSON form)
    NotANumber(String),
    /// A number below zero
    Negative,
    /// A number outside what a decimal quantity can hold
    OutOfRange(String),
    /// Present but not an ISO 8601 date or date-time
    UnparseableDate(String),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::Missing => write!(f, "is missing"),
            MalformedReason::NotANumber(value) => write!(f, "is not a number: {}", value),
            MalformedReason::Negative => write!(f, "is negative"),
            MalformedReason::OutOfRange(value) => write!(f, "is out of range: {}", value),
            MalformedReason::UnparseableDate(value) => {
                write!(f, "is not an ISO 8601 date: {}", value)
            }
        }
    }
}

/// A record's name, numeric or date fields could not be interpreted.
///
/// Carries the record id so callers can locate the bad record and decide
/// whether to skip, log or abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecordError {
    pub id: RecordId,
    pub field: MalformedField,
    pub reason: MalformedReason,
}

impl MalformedRecordError {
    #[must_use]
    pub fn new(id: RecordId, field: MalformedField, reason: MalformedReason) -> Self {
        Self { id, field, reason }
    }
}

impl fmt::Display for MalformedRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed record {}: {} {}", self.id, self.field, self.reason)
    }
}

impl std::error::Error for MalformedRecordError {}
