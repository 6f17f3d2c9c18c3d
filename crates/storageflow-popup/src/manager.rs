//! Storage manager
//!
//! Thin async wrapper over the script host plus the display helpers the
//! popup renders with (value typing, pretty-printing, size formatting,
//! search filtering).

use std::sync::Arc;

use storageflow_bridge::{StorageMode, StorageSnapshot};
use storageflow_router::TabId;

use crate::host::ScriptHost;
use crate::Result;

pub struct StorageManager {
    host: Arc<dyn ScriptHost>,
}

impl StorageManager {
    pub fn new(host: Arc<dyn ScriptHost>) -> Self {
        Self { host }
    }

    pub async fn load(&self, tab: TabId, mode: StorageMode) -> Result<StorageSnapshot> {
        self.host.read_all(tab, mode).await
    }

    pub async fn set(&self, tab: TabId, mode: StorageMode, key: &str, value: &str) -> Result<()> {
        self.host.set_item(tab, mode, key, value).await
    }

    pub async fn remove(&self, tab: TabId, mode: StorageMode, key: &str) -> Result<()> {
        self.host.remove_item(tab, mode, key).await
    }

    pub async fn clear(&self, tab: TabId, mode: StorageMode) -> Result<()> {
        self.host.clear(tab, mode).await
    }

    /// "JSON" when the stored string parses as JSON, "String" otherwise.
    pub fn value_type(value: &str) -> &'static str {
        if serde_json::from_str::<serde_json::Value>(value).is_ok() {
            "JSON"
        } else {
            "String"
        }
    }

    /// Pretty-print JSON values for display; everything else verbatim.
    pub fn format_value(value: &str) -> String {
        match serde_json::from_str::<serde_json::Value>(value) {
            Ok(parsed) => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| value.to_string()),
            Err(_) => value.to_string(),
        }
    }

    pub fn format_size(bytes: usize) -> String {
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Case-insensitive substring filter over keys and values.
    pub fn filter(snapshot: &StorageSnapshot, term: &str) -> StorageSnapshot {
        if term.is_empty() {
            return snapshot.clone();
        }

        let term = term.to_lowercase();
        snapshot
            .iter()
            .filter(|(key, value)| {
                key.to_lowercase().contains(&term) || value.to_lowercase().contains(&term)
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
