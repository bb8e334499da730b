//! Stock status evaluation.
//!
//! Derives the low-stock and expired flags for a snapshot of inventory
//! records and orders the result for "requires attention" display:
//! expired records first, input order preserved within each group.
//!
//! Evaluation is a pure function of the records and the supplied `now`.
//! Nothing is cached between calls, so callers re-evaluate whenever the
//! data or the clock moves.

use crate::record::{InventoryRecord, MalformedRecordError, RawRecord, RecordKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;

/// Derived flags for one record at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockStatus {
    pub is_low_stock: bool,
    pub is_expired: bool,
}

impl StockStatus {
    #[must_use]
    pub fn of(record: &InventoryRecord, now: DateTime<Utc>) -> Self {
        Self {
            is_low_stock: record.is_low_stock(),
            is_expired: record.is_expired_at(now),
        }
    }
}

/// An inventory record with its derived flags
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: InventoryRecord,
    pub is_low_stock: bool,
    pub is_expired: bool,
}

impl AnnotatedRecord {
    #[must_use]
    pub fn new(record: InventoryRecord, now: DateTime<Utc>) -> Self {
        let status = StockStatus::of(&record, now);
        Self {
            record,
            is_low_stock: status.is_low_stock,
            is_expired: status.is_expired,
        }
    }

    /// Low on stock, expired, or both
    #[must_use]
    pub fn requires_attention(&self) -> bool {
        self.is_low_stock || self.is_expired
    }

    #[must_use]
    pub fn status(&self) -> StockStatus {
        StockStatus {
            is_low_stock: self.is_low_stock,
            is_expired: self.is_expired,
        }
    }
}

/// Evaluate raw records fetched from the inventory API.
///
/// Every record is validated, annotated against `now`, and the result is
/// stably partitioned so expired records come first. The output is a
/// permutation of the input: duplicate ids are kept as-is.
///
/// # Errors
///
/// Returns the [`MalformedRecordError`] of the first record, in input order,
/// whose name, quantity, threshold or expiry date cannot be interpreted.
pub fn evaluate(
    records: &[RawRecord],
    now: DateTime<Utc>,
) -> Result<Vec<AnnotatedRecord>, MalformedRecordError> {
    evaluate_tagged(records.iter().map(|raw| (RecordKind::Unspecified, raw)), now)
}

/// [`evaluate`], tagging every record with `kind`.
///
/// # Errors
///
/// See [`evaluate`].
pub fn evaluate_kind(
    records: &[RawRecord],
    kind: RecordKind,
    now: DateTime<Utc>,
) -> Result<Vec<AnnotatedRecord>, MalformedRecordError> {
    evaluate_tagged(records.iter().map(|raw| (kind, raw)), now)
}

/// [`evaluate`] over records drawn from several sources, each tagged with
/// the kind it came from.
///
/// # Errors
///
/// See [`evaluate`].
pub fn evaluate_tagged<'a, I>(
    records: I,
    now: DateTime<Utc>,
) -> Result<Vec<AnnotatedRecord>, MalformedRecordError>
where
    I: IntoIterator<Item = (RecordKind, &'a RawRecord)>,
{
    let started = Instant::now();

    let parsed: Result<Vec<InventoryRecord>, MalformedRecordError> = records
        .into_iter()
        .map(|(kind, raw)| InventoryRecord::parse(raw, kind))
        .collect();

    let parsed = match parsed {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("Stock evaluation rejected record {}: {}", err.id, err);
            #[cfg(feature = "metrics")]
            crate::metrics::METRICS.record_malformed();
            return Err(err);
        }
    };

    let annotated = annotate(parsed, now);
    let elapsed = started.elapsed();

    log::debug!(
        "Evaluated {} record(s) in {:?}: {} expired, {} low on stock",
        annotated.len(),
        elapsed,
        annotated.iter().filter(|r| r.is_expired).count(),
        annotated.iter().filter(|r| r.is_low_stock).count()
    );
    #[cfg(feature = "metrics")]
    crate::metrics::METRICS.record_evaluation(annotated.len(), elapsed);

    Ok(annotated)
}

/// Annotate already-validated records and order them expired-first.
///
/// Infallible core of [`evaluate`]. `is_low_stock` plays no part in the
/// ordering.
pub fn annotate<I>(records: I, now: DateTime<Utc>) -> Vec<AnnotatedRecord>
where
    I: IntoIterator<Item = InventoryRecord>,
{
    let (mut expired, current): (Vec<_>, Vec<_>) = records
        .into_iter()
        .map(|record| AnnotatedRecord::new(record, now))
        .partition(|annotated| annotated.is_expired);

    expired.extend(current);
    expired
}
