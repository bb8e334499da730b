//! # Labstock
//!
//! Stock status evaluation for laboratory inventory dashboards.
//!
//! Given chemicals and equipment fetched from the inventory REST API,
//! [`status::evaluate`] flags low-stock and expired records and orders them
//! for display with expired records first. The rest of the crate covers
//! what a dashboard needs around that: typed resources, aggregations,
//! search and pagination, and a blocking REST client.
//!
//! ```rust
//! use chrono::Utc;
//! use labstock::record::RawRecord;
//!
//! let records: Vec<RawRecord> = serde_json::from_str(
//!     r#"[{"id": 1, "name": "Ethanol", "quantity": 2, "minQuantity": 5}]"#,
//! ).unwrap();
//! let items = labstock::status::evaluate(&records, Utc::now()).unwrap();
//! assert!(items[0].is_low_stock);
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod listing;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod model;
pub mod record;
pub mod service;
pub mod status;

pub use client::{ApiError, BearerToken, HttpInventoryApi, InventoryApi, Resource};
pub use config::LabstockConfig;
pub use record::{InventoryRecord, MalformedRecordError, RawRecord, RecordKind};
pub use service::{DashboardService, ServiceError};
pub use status::{evaluate, AnnotatedRecord, StockStatus};
