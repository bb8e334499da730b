//! Dashboard service: fetches inventory through an [`InventoryApi`] and
//! runs the stock status evaluator and aggregations over it.

use crate::client::{ApiError, InventoryApi, Resource};
use crate::config::DashboardConfig;
use crate::dashboard::{self, DashboardStats};
use crate::model::{Chemical, Equipment, InventoryTransaction, Supplier};
use crate::record::{InventoryRecord, MalformedRecordError, RecordKind};
use crate::status::{self, AnnotatedRecord};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;

/// Error returned by [`DashboardService`] operations
#[derive(Debug)]
pub enum ServiceError {
    Api(ApiError),
    Malformed(MalformedRecordError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Api(e) => write!(f, "{}", e),
            ServiceError::Malformed(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Api(e) => Some(e),
            ServiceError::Malformed(e) => Some(e),
        }
    }
}

impl From<ApiError> for ServiceError {
    fn from(error: ApiError) -> Self {
        ServiceError::Api(error)
    }
}

impl From<MalformedRecordError> for ServiceError {
    fn from(error: MalformedRecordError) -> Self {
        ServiceError::Malformed(error)
    }
}

pub struct DashboardService<A> {
    api: A,
    settings: DashboardConfig,
}

impl<A: InventoryApi> DashboardService<A> {
    #[must_use]
    pub fn new(api: A, settings: DashboardConfig) -> Self {
        Self { api, settings }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Items requiring attention: low-stock candidates from both the
    /// equipment and chemical endpoints, evaluated against `now`.
    ///
    /// Equipment is fetched first and precedes chemicals within each group.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` if either fetch fails and
    /// `ServiceError::Malformed` if any returned record cannot be evaluated.
    pub fn attention_items(&self, now: DateTime<Utc>) -> Result<Vec<AnnotatedRecord>, ServiceError> {
        log::debug!("Loading attention items");
        let equipment = self
            .api
            .low_stock(RecordKind::Equipment)
            .inspect_err(|e| log::warn!("Equipment low-stock fetch failed: {}", e))?;
        let chemicals = self
            .api
            .low_stock(RecordKind::Chemical)
            .inspect_err(|e| log::warn!("Chemical low-stock fetch failed: {}", e))?;

        let tagged = equipment
            .iter()
            .map(|raw| (RecordKind::Equipment, raw))
            .chain(chemicals.iter().map(|raw| (RecordKind::Chemical, raw)));
        let items = status::evaluate_tagged(tagged, now)?;

        log::info!(
            "{} attention item(s): {} expired",
            items.len(),
            items.iter().filter(|item| item.is_expired).count()
        );
        Ok(items)
    }

    /// Stats as reported by the backend
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` if the request fails.
    pub fn stats(&self) -> Result<DashboardStats, ServiceError> {
        log::debug!("Loading dashboard stats");
        let stats = self
            .api
            .dashboard_stats()
            .inspect_err(|e| log::warn!("Dashboard stats fetch failed: {}", e))?;
        log::info!(
            "Backend reports {} chemical(s), {} equipment item(s), {} low-stock alert(s)",
            stats.total_chemicals,
            stats.equipment_items,
            stats.low_stock_alerts
        );
        Ok(stats)
    }

    /// Stats computed from full listings, independent of the backend's
    /// own counters
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` if any listing fails.
    pub fn local_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, ServiceError> {
        log::debug!("Computing dashboard stats from listings");
        let chemicals: Vec<Chemical> = self.list(Resource::Chemicals)?;
        let equipment: Vec<Equipment> = self.list(Resource::Equipment)?;
        let suppliers: Vec<Supplier> = self.list(Resource::Suppliers)?;

        let stats = DashboardStats::compute(&chemicals, &equipment, &suppliers, now);
        log::info!(
            "Computed stats over {} chemical(s), {} equipment item(s), {} supplier(s)",
            chemicals.len(),
            equipment.len(),
            suppliers.len()
        );
        Ok(stats)
    }

    /// The most recent transactions, capped at the configured count
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` if the request fails.
    pub fn recent_transactions(&self) -> Result<Vec<InventoryTransaction>, ServiceError> {
        log::debug!("Loading recent transactions");
        let transactions = self
            .api
            .recent_transactions()
            .inspect_err(|e| log::warn!("Recent transactions fetch failed: {}", e))?;
        let recent =
            dashboard::recent_transactions(&transactions, self.settings.recent_transactions);
        log::info!(
            "{} recent transaction(s) of {} returned",
            recent.len(),
            transactions.len()
        );
        Ok(recent)
    }

    /// Chemicals expiring within the configured window
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` if the listing fails.
    pub fn expiring_soon(&self, now: DateTime<Utc>) -> Result<Vec<AnnotatedRecord>, ServiceError> {
        log::debug!(
            "Loading chemicals expiring within {} day(s)",
            self.settings.expiring_soon_days
        );
        let chemicals: Vec<Chemical> = self.list(Resource::Chemicals)?;
        let window = Duration::try_days(self.settings.expiring_soon_days).unwrap_or(Duration::MAX);
        let soon = dashboard::expiring_within(
            chemicals.iter().map(InventoryRecord::from),
            now,
            window,
        );
        log::info!(
            "{} chemical(s) expire within {} day(s)",
            soon.len(),
            self.settings.expiring_soon_days
        );
        Ok(soon)
    }

    fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError> {
        self.api
            .list(resource)
            .inspect_err(|e| log::warn!("Listing {} failed: {}", resource, e))
    }
}
