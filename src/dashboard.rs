//! Dashboard aggregations: headline stats, recent transactions and the
//! "expiring soon" window.

use crate::model::{Chemical, Equipment, InventoryTransaction, Supplier};
use crate::record::InventoryRecord;
use crate::status::AnnotatedRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Number of transactions the dashboard shows by default
pub const DEFAULT_RECENT_TRANSACTIONS: usize = 5;

/// Headline counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireStats")]
pub struct DashboardStats {
    pub total_chemicals: u64,
    pub equipment_items: u64,
    pub low_chemical_stock: u64,
    pub low_equipment_stock: u64,
    /// Sum of the two low-stock counters
    pub low_stock_alerts: u64,
    pub expired_items: u64,
    pub active_suppliers: u64,
}

/// Stats payload as the backend sends it: any counter may be absent or `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireStats {
    total_chemicals: Option<u64>,
    equipment_items: Option<u64>,
    low_chemical_stock: Option<u64>,
    low_equipment_stock: Option<u64>,
    low_stock_alerts: Option<u64>,
    expired_items: Option<u64>,
    active_suppliers: Option<u64>,
}

impl From<WireStats> for DashboardStats {
    fn from(wire: WireStats) -> Self {
        let low_chemical_stock = wire.low_chemical_stock.unwrap_or(0);
        let low_equipment_stock = wire.low_equipment_stock.unwrap_or(0);
        Self {
            total_chemicals: wire.total_chemicals.unwrap_or(0),
            equipment_items: wire.equipment_items.unwrap_or(0),
            low_chemical_stock,
            low_equipment_stock,
            low_stock_alerts: wire
                .low_stock_alerts
                .unwrap_or(low_chemical_stock + low_equipment_stock),
            expired_items: wire.expired_items.unwrap_or(0),
            active_suppliers: wire.active_suppliers.unwrap_or(0),
        }
    }
}

impl DashboardStats {
    /// Compute the stats client-side from full resource listings.
    ///
    /// Low-stock and expiry follow the evaluator's rules: strict
    /// comparisons, and a missing threshold or expiry never counts.
    #[must_use]
    pub fn compute(
        chemicals: &[Chemical],
        equipment: &[Equipment],
        suppliers: &[Supplier],
        now: DateTime<Utc>,
    ) -> Self {
        let chemical_records: Vec<InventoryRecord> =
            chemicals.iter().map(InventoryRecord::from).collect();
        let equipment_records: Vec<InventoryRecord> =
            equipment.iter().map(InventoryRecord::from).collect();

        let low_chemical_stock = count(&chemical_records, InventoryRecord::is_low_stock);
        let low_equipment_stock = count(&equipment_records, InventoryRecord::is_low_stock);
        let expired_items = chemical_records
            .iter()
            .chain(&equipment_records)
            .filter(|record| record.is_expired_at(now))
            .count() as u64;

        Self {
            total_chemicals: chemicals.len() as u64,
            equipment_items: equipment.len() as u64,
            low_chemical_stock,
            low_equipment_stock,
            low_stock_alerts: low_chemical_stock + low_equipment_stock,
            expired_items,
            // Suppliers carry no activity flag; every registered one counts.
            active_suppliers: suppliers.len() as u64,
        }
    }
}

fn count(records: &[InventoryRecord], predicate: fn(&InventoryRecord) -> bool) -> u64 {
    records.iter().filter(|record| predicate(record)).count() as u64
}

/// The `limit` most recent transactions, newest first.
///
/// Ordered by `transactionDate`; transactions on the same date keep their
/// input order and undated ones sort last.
#[must_use]
pub fn recent_transactions(
    transactions: &[InventoryTransaction],
    limit: usize,
) -> Vec<InventoryTransaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    sorted.truncate(limit);
    sorted
}

/// Records not yet expired whose expiry falls within `window` of `now`.
///
/// Ordered soonest first, ties in input order. Records without an expiry
/// never appear, and a negative window selects nothing.
#[must_use]
pub fn expiring_within<I>(records: I, now: DateTime<Utc>, window: Duration) -> Vec<AnnotatedRecord>
where
    I: IntoIterator<Item = InventoryRecord>,
{
    if window < Duration::zero() {
        return Vec::new();
    }
    let horizon = now
        .checked_add_signed(window)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let mut soon: Vec<AnnotatedRecord> = records
        .into_iter()
        .filter(|record| record.expiry.is_some_and(|expiry| expiry >= now && expiry <= horizon))
        .map(|record| AnnotatedRecord::new(record, now))
        .collect();
    soon.sort_by_key(|annotated| annotated.record.expiry);
    soon
}
