//! REST client for the inventory backend.
//!
//! [`InventoryApi`] is the seam the dashboard service talks through;
//! [`HttpInventoryApi`] implements it with blocking `ureq` calls. Retries,
//! caching and token refresh are left to callers.

mod error;
mod http;

pub use error::ApiError;
pub use http::HttpInventoryApi;

use crate::dashboard::DashboardStats;
use crate::model::{InventoryTransaction, RecordId};
use crate::record::{RawRecord, RecordKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const DASHBOARD_STATS_PATH: &str = "/api/dashboard/stats";
pub const RECENT_TRANSACTIONS_PATH: &str = "/api/dashboard/transactions/recent";
pub const EQUIPMENT_LOW_STOCK_PATH: &str = "/api/dashboard/equipment/low-stock";
pub const CHEMICALS_LOW_STOCK_PATH: &str = "/api/dashboard/chemicals/low-stock";
pub const LOW_STOCK_PATH: &str = "/api/dashboard/stock/low";

/// A CRUD resource exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Chemicals,
    Equipment,
    Suppliers,
    Transactions,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Chemicals,
        Resource::Equipment,
        Resource::Suppliers,
        Resource::Transactions,
    ];

    /// Collection path, e.g. `/api/chemicals`
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Chemicals => "/api/chemicals",
            Resource::Equipment => "/api/equipment",
            Resource::Suppliers => "/api/suppliers",
            Resource::Transactions => "/api/transactions",
        }
    }

    /// Item path, e.g. `/api/chemicals/12`
    #[must_use]
    pub fn item_path(&self, id: &RecordId) -> String {
        format!("{}/{}", self.path(), id)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Chemicals => "chemicals",
            Resource::Equipment => "equipment",
            Resource::Suppliers => "suppliers",
            Resource::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource name not recognised by [`Resource::from_str`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResource(pub String);

impl fmt::Display for UnknownResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown resource '{}' (expected chemicals, equipment, suppliers or transactions)",
            self.0
        )
    }
}

impl std::error::Error for UnknownResource {}

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chemical" | "chemicals" => Ok(Resource::Chemicals),
            "equipment" => Ok(Resource::Equipment),
            "supplier" | "suppliers" => Ok(Resource::Suppliers),
            "transaction" | "transactions" => Ok(Resource::Transactions),
            _ => Err(UnknownResource(s.to_string())),
        }
    }
}

/// Low-stock endpoint for a record kind
#[must_use]
pub fn low_stock_path(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Chemical => CHEMICALS_LOW_STOCK_PATH,
        RecordKind::Equipment => EQUIPMENT_LOW_STOCK_PATH,
        RecordKind::Unspecified => LOW_STOCK_PATH,
    }
}

/// Opaque bearer token gating access to the API.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// `None` for an empty or whitespace-only token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Value for the `Authorization` header
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Operations the inventory backend offers
pub trait InventoryApi {
    /// All items of a resource. An empty or `null` body is an empty list.
    fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError>;

    /// One item, `None` when the backend has no such id
    fn get<T: DeserializeOwned>(&self, resource: Resource, id: &RecordId)
        -> Result<Option<T>, ApiError>;

    /// Create an item and return the stored version
    fn create<T: Serialize + DeserializeOwned>(&self, resource: Resource, item: &T)
        -> Result<T, ApiError>;

    /// Replace an item and return the stored version
    fn update<T: Serialize + DeserializeOwned>(
        &self,
        resource: Resource,
        id: &RecordId,
        item: &T,
    ) -> Result<T, ApiError>;

    fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), ApiError>;

    fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;

    fn recent_transactions(&self) -> Result<Vec<InventoryTransaction>, ApiError>;

    /// Low-stock candidates as raw records, left for the evaluator to validate
    fn low_stock(&self, kind: RecordKind) -> Result<Vec<RawRecord>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Chemicals.path(), "/api/chemicals");
        assert_eq!(
            Resource::Suppliers.item_path(&RecordId::from(4)),
            "/api/suppliers/4"
        );
        assert_eq!(low_stock_path(RecordKind::Equipment), EQUIPMENT_LOW_STOCK_PATH);
    }

    #[test]
    fn test_resource_from_str() {
        assert_eq!("Chemical".parse::<Resource>(), Ok(Resource::Chemicals));
        assert_eq!("transactions".parse::<Resource>(), Ok(Resource::Transactions));
        for resource in Resource::ALL {
            assert_eq!(resource.name().parse::<Resource>(), Ok(resource));
        }
        assert!("reagents".parse::<Resource>().is_err());
    }

    #[test]
    fn test_bearer_token() {
        assert!(BearerToken::new("  ").is_none());
        let token = BearerToken::new(" secret ").unwrap();
        assert_eq!(token.header_value(), "Bearer secret");
        assert_eq!(format!("{:?}", token), "BearerToken(***)");
    }
}
