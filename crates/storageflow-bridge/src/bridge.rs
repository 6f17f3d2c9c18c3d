//! Storage Bridge
//!
//! Per-page facade over an observed namespace. All operations return
//! `Result`; the protocol layer (`handle`) folds failures into tagged
//! responses so nothing throws across the context boundary.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::namespace::{ObservedNamespace, StorageNamespace};
use crate::protocol::{BridgeRequest, BridgeResponse};
use crate::{Result, StorageSnapshot};

/// Where the bridge is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOrigin {
    pub domain: String,
    pub url: String,
}

impl PageOrigin {
    pub fn new(domain: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub key_count: usize,
    /// UTF-8 size of the JSON-serialized snapshot. An estimate, matching
    /// what the page itself would compute, not the backend's real usage.
    pub total_size_bytes: usize,
    pub domain: String,
    pub url: String,
}

pub struct StorageBridge {
    namespace: Arc<ObservedNamespace>,
    origin: PageOrigin,
}

impl StorageBridge {
    pub fn new(namespace: Arc<ObservedNamespace>, origin: PageOrigin) -> Self {
        Self { namespace, origin }
    }

    pub fn origin(&self) -> &PageOrigin {
        &self.origin
    }

    /// Full snapshot of the namespace.
    pub fn read(&self) -> StorageSnapshot {
        self.namespace.snapshot()
    }

    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        self.namespace.set(key, value)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.namespace.remove(key);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.namespace.clear();
        Ok(())
    }

    pub fn describe(&self) -> StorageInfo {
        let snapshot = self.read();
        let total_size_bytes = serde_json::to_string(&snapshot)
            .map(|json| json.len())
            .unwrap_or(0);

        StorageInfo {
            key_count: snapshot.len(),
            total_size_bytes,
            domain: self.origin.domain.clone(),
            url: self.origin.url.clone(),
        }
    }

    /// Serve one protocol request. Never returns Err: failures become
    /// `{success: false, error}` responses.
    pub fn handle(&self, request: BridgeRequest) -> BridgeResponse {
        match request {
            BridgeRequest::GetStorage => BridgeResponse::with_data(self.read()),
            BridgeRequest::SetItem { key, value } => match self.write(&key, &value) {
                Ok(()) => BridgeResponse::ok(),
                Err(e) => BridgeResponse::err(e.to_string()),
            },
            BridgeRequest::RemoveItem { key } => match self.remove(&key) {
                Ok(()) => BridgeResponse::ok(),
                Err(e) => BridgeResponse::err(e.to_string()),
            },
            BridgeRequest::ClearStorage => match self.clear() {
                Ok(()) => BridgeResponse::ok(),
                Err(e) => BridgeResponse::err(e.to_string()),
            },
            BridgeRequest::GetStorageInfo => BridgeResponse::with_info(self.describe()),
        }
    }
}
