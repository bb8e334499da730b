//! DashboardService against an in-memory InventoryApi

use chrono::{DateTime, TimeZone, Utc};
use labstock::client::{
    low_stock_path, ApiError, InventoryApi, Resource, DASHBOARD_STATS_PATH,
    RECENT_TRANSACTIONS_PATH,
};
use labstock::config::DashboardConfig;
use labstock::dashboard::DashboardStats;
use labstock::model::{InventoryTransaction, RecordId};
use labstock::record::{MalformedField, RawRecord, RecordKind};
use labstock::{DashboardService, ServiceError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Mutex, Once};

/// Keeps every log line emitted while the tests run
struct CaptureLogger;

static LINES: Mutex<Vec<(log::Level, String)>> = Mutex::new(Vec::new());
static INSTALL: Once = Once::new();

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        LINES
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn capture_logs() {
    INSTALL.call_once(|| {
        log::set_logger(&CaptureLogger).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
}

fn logged(level: log::Level, fragment: &str) -> bool {
    LINES
        .lock()
        .unwrap()
        .iter()
        .any(|(l, line)| *l == level && line.contains(fragment))
}

#[derive(Default)]
struct FakeApi {
    responses: HashMap<String, Value>,
    failing: Option<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeApi {
    fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    fn failing_on(mut self, path: &str) -> Self {
        self.failing = Some(path.to_string());
        self
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.calls.borrow_mut().push(path.to_string());
        if self.failing.as_deref() == Some(path) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        let body = self
            .responses
            .get(path)
            .cloned()
            .ok_or(ApiError::Status { code: 404, body: String::new() })?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

impl InventoryApi for FakeApi {
    fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError> {
        self.fetch(resource.path())
    }

    fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &RecordId,
    ) -> Result<Option<T>, ApiError> {
        self.fetch(&resource.item_path(id))
    }

    fn create<T: Serialize + DeserializeOwned>(
        &self,
        _resource: Resource,
        item: &T,
    ) -> Result<T, ApiError> {
        serde_json::from_value(serde_json::to_value(item).unwrap()).map_err(|e| {
            ApiError::Decode {
                path: String::new(),
                message: e.to_string(),
            }
        })
    }

    fn update<T: Serialize + DeserializeOwned>(
        &self,
        resource: Resource,
        _id: &RecordId,
        item: &T,
    ) -> Result<T, ApiError> {
        self.create(resource, item)
    }

    fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(resource.item_path(id));
        Ok(())
    }

    fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.fetch(DASHBOARD_STATS_PATH)
    }

    fn recent_transactions(&self) -> Result<Vec<InventoryTransaction>, ApiError> {
        self.fetch(RECENT_TRANSACTIONS_PATH)
    }

    fn low_stock(&self, kind: RecordKind) -> Result<Vec<RawRecord>, ApiError> {
        self.fetch(low_stock_path(kind))
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn service(api: FakeApi) -> DashboardService<FakeApi> {
    DashboardService::new(api, DashboardConfig::default())
}

#[test]
fn test_attention_items_merge_equipment_then_chemicals() {
    let api = FakeApi::default()
        .with(
            low_stock_path(RecordKind::Equipment),
            json!([
                { "id": 10, "name": "Centrifuge", "quantity": 1, "minQuantity": 2, "status": "ACTIVE" }
            ]),
        )
        .with(
            low_stock_path(RecordKind::Chemical),
            json!([
                { "id": 1, "name": "Ethanol", "quantity": 3, "minQuantity": 5 },
                { "id": 2, "name": "Acetone", "quantity": 50, "minQuantity": 5, "expiryDate": "2023-12-31" }
            ]),
        );

    let service = service(api);
    let items = service.attention_items(now()).unwrap();

    let names: Vec<&str> = items.iter().map(|i| i.record.name.as_str()).collect();
    assert_eq!(names, vec!["Acetone", "Centrifuge", "Ethanol"]);
    assert_eq!(items[0].record.kind, RecordKind::Chemical);
    assert_eq!(items[1].record.kind, RecordKind::Equipment);
    assert!(items[0].is_expired && !items[0].is_low_stock);
    assert!(items[1].is_low_stock && items[2].is_low_stock);
    assert_eq!(
        *service.api().calls.borrow(),
        vec![
            low_stock_path(RecordKind::Equipment).to_string(),
            low_stock_path(RecordKind::Chemical).to_string()
        ]
    );
}

#[test]
fn test_attention_items_surface_malformed_record() {
    let api = FakeApi::default()
        .with(low_stock_path(RecordKind::Equipment), json!([]))
        .with(
            low_stock_path(RecordKind::Chemical),
            json!([{ "id": 7, "name": "Buffer", "quantity": 1, "expiryDate": "not a date" }]),
        );

    match service(api).attention_items(now()) {
        Err(ServiceError::Malformed(err)) => {
            assert_eq!(err.id, RecordId::from(7));
            assert_eq!(err.field, MalformedField::ExpiryDate);
        }
        other => panic!("expected malformed record error, got {:?}", other),
    }
}

#[test]
fn test_attention_items_propagate_fetch_failure() {
    let api = FakeApi::default()
        .with(low_stock_path(RecordKind::Equipment), json!([]))
        .failing_on(low_stock_path(RecordKind::Chemical));

    let err = service(api).attention_items(now()).unwrap_err();
    assert!(matches!(err, ServiceError::Api(ApiError::Transport(_))));
}

#[test]
fn test_local_stats_match_evaluator_rules() {
    let api = FakeApi::default()
        .with(
            Resource::Chemicals.path(),
            json!([
                { "id": 1, "name": "Ethanol", "quantity": 5, "minQuantity": 5, "expiryDate": "2023-06-01" },
                { "id": 2, "name": "Acetone", "quantity": 1, "minQuantity": 2 }
            ]),
        )
        .with(
            Resource::Equipment.path(),
            json!([{ "id": 1, "name": "Scope", "quantity": 3 }]),
        )
        .with(
            Resource::Suppliers.path(),
            json!([{ "id": 1, "name": "Acme" }, { "id": 2, "name": "Globex" }]),
        );

    let stats = service(api).local_stats(now()).unwrap();
    assert_eq!(stats.total_chemicals, 2);
    assert_eq!(stats.equipment_items, 1);
    assert_eq!(stats.low_chemical_stock, 1);
    assert_eq!(stats.low_equipment_stock, 0);
    assert_eq!(stats.low_stock_alerts, 1);
    assert_eq!(stats.expired_items, 1);
    assert_eq!(stats.active_suppliers, 2);
}

#[test]
fn test_backend_stats_pass_through() {
    let api = FakeApi::default().with(
        DASHBOARD_STATS_PATH,
        json!({ "totalChemicals": 4, "lowChemicalStock": 1, "lowEquipmentStock": 2 }),
    );
    let stats = service(api).stats().unwrap();
    assert_eq!(stats.total_chemicals, 4);
    assert_eq!(stats.low_stock_alerts, 3);
}

#[test]
fn test_recent_transactions_capped_by_config() {
    let transactions: Vec<Value> = (1..=8)
        .map(|day| json!({ "id": day, "quantity": 1, "transactionDate": format!("2024-01-{:02}", day) }))
        .collect();
    let api = FakeApi::default().with(RECENT_TRANSACTIONS_PATH, Value::Array(transactions));

    let settings = DashboardConfig {
        recent_transactions: 3,
        ..DashboardConfig::default()
    };
    let recent = DashboardService::new(api, settings)
        .recent_transactions()
        .unwrap();
    let ids: Vec<RecordId> = recent.iter().map(|tx| tx.id.clone()).collect();
    assert_eq!(ids, vec![RecordId::from(8), RecordId::from(7), RecordId::from(6)]);
}

#[test]
fn test_expiring_soon_uses_configured_window() {
    let api = FakeApi::default().with(
        Resource::Chemicals.path(),
        json!([
            { "id": 1, "name": "Old", "quantity": 1, "expiryDate": "2023-12-01" },
            { "id": 2, "name": "Soon", "quantity": 1, "expiryDate": "2024-01-05" },
            { "id": 3, "name": "Later", "quantity": 1, "expiryDate": "2024-03-01" },
            { "id": 4, "name": "Never", "quantity": 1 }
        ]),
    );
    let settings = DashboardConfig {
        expiring_soon_days: 7,
        ..DashboardConfig::default()
    };

    let soon = DashboardService::new(api, settings)
        .expiring_soon(now())
        .unwrap();
    assert_eq!(soon.len(), 1);
    assert_eq!(soon[0].record.name, "Soon");
}

#[test]
fn test_listing_failures_are_logged_and_returned() {
    capture_logs();
    let api = FakeApi::default()
        .with(Resource::Chemicals.path(), json!([]))
        .failing_on(Resource::Equipment.path());
    let err = service(api).local_stats(now()).unwrap_err();
    assert!(matches!(err, ServiceError::Api(ApiError::Transport(_))));
    assert!(logged(log::Level::Warn, "Listing equipment failed"));

    let api = FakeApi::default().failing_on(Resource::Chemicals.path());
    assert!(service(api).expiring_soon(now()).is_err());
    assert!(logged(log::Level::Warn, "Listing chemicals failed"));
}

#[test]
fn test_successful_calls_log_entry_and_counts() {
    capture_logs();
    let api = FakeApi::default()
        .with(DASHBOARD_STATS_PATH, json!({ "totalChemicals": 41 }))
        .with(
            RECENT_TRANSACTIONS_PATH,
            json!([{ "id": 1, "quantity": 1, "transactionDate": "2024-01-01" }]),
        );
    let service = service(api);

    service.stats().unwrap();
    assert!(logged(log::Level::Debug, "Loading dashboard stats"));
    assert!(logged(log::Level::Info, "Backend reports 41 chemical(s)"));

    service.recent_transactions().unwrap();
    assert!(logged(log::Level::Debug, "Loading recent transactions"));
    assert!(logged(log::Level::Info, "1 recent transaction(s) of 1 returned"));
}
