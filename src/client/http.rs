//! Blocking HTTP implementation of [`InventoryApi`]

use super::{low_stock_path, ApiError, BearerToken, InventoryApi, Resource};
use super::{DASHBOARD_STATS_PATH, RECENT_TRANSACTIONS_PATH};
use crate::config::ApiConfig;
use crate::dashboard::DashboardStats;
use crate::model::{InventoryTransaction, RecordId};
use crate::record::{RawRecord, RecordKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// [`InventoryApi`] over HTTP, with the bearer token on every request
pub struct HttpInventoryApi {
    agent: ureq::Agent,
    base_url: String,
    token: Option<BearerToken>,
}

impl HttpInventoryApi {
    /// Build a client from configuration. The token is optional here so a
    /// missing one surfaces as [`ApiError::Unauthenticated`] on first use.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().and_then(BearerToken::new),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: BearerToken) -> Self {
        self.token = Some(token);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Absolute URL for an API path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, method: &str, path: &str, body: Option<&str>) -> Result<String, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::Unauthenticated)?;
        let url = self.url(path);
        log::debug!("{} {}", method, url);

        let request = self
            .agent
            .request(method, &url)
            .set("Authorization", &token.header_value())
            .set("Accept", "application/json");
        let result = match body {
            Some(body) => request
                .set("Content-Type", "application/json")
                .send_string(body),
            None => request.call(),
        };

        match result {
            Ok(response) => response
                .into_string()
                .map_err(|e| ApiError::Transport(e.to_string())),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                log::warn!("{} {} returned status {}", method, url, code);
                Err(ApiError::Status { code, body })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(ApiError::Transport(transport.to_string()))
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send("GET", path, None)?;
        decode(path, &body)
    }

    fn write_json<T: Serialize + DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        item: &T,
    ) -> Result<T, ApiError> {
        let payload = serde_json::to_string(item).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let body = self.send(method, path, Some(&payload))?;
        decode(path, &body)
    }
}

/// Decode a JSON body, reading an empty body as `null`
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

impl InventoryApi for HttpInventoryApi {
    fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError> {
        let items: Option<Vec<T>> = self.get_json(resource.path())?;
        Ok(items.unwrap_or_default())
    }

    fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &RecordId,
    ) -> Result<Option<T>, ApiError> {
        match self.get_json(&resource.item_path(id)) {
            Err(ApiError::Status { code: 404, .. }) => Ok(None),
            other => other,
        }
    }

    fn create<T: Serialize + DeserializeOwned>(
        &self,
        resource: Resource,
        item: &T,
    ) -> Result<T, ApiError> {
        self.write_json("POST", resource.path(), item)
    }

    fn update<T: Serialize + DeserializeOwned>(
        &self,
        resource: Resource,
        id: &RecordId,
        item: &T,
    ) -> Result<T, ApiError> {
        self.write_json("PUT", &resource.item_path(id), item)
    }

    fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), ApiError> {
        self.send("DELETE", &resource.item_path(id), None)?;
        Ok(())
    }

    fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let stats: Option<DashboardStats> = self.get_json(DASHBOARD_STATS_PATH)?;
        Ok(stats.unwrap_or_default())
    }

    fn recent_transactions(&self) -> Result<Vec<InventoryTransaction>, ApiError> {
        let transactions: Option<Vec<InventoryTransaction>> =
            self.get_json(RECENT_TRANSACTIONS_PATH)?;
        Ok(transactions.unwrap_or_default())
    }

    fn low_stock(&self, kind: RecordKind) -> Result<Vec<RawRecord>, ApiError> {
        let records: Option<Vec<RawRecord>> = self.get_json(low_stock_path(kind))?;
        Ok(records.unwrap_or_default())
    }
}
