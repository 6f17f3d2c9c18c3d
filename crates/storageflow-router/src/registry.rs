//! Tab registry
//!
//! Advisory per-tab metadata, owned by the router instance. Records are
//! upserted on page-ready signals and navigation completion, removed on
//! tab close, and swept when stale. The map is explicitly bounded:
//! overflow evicts the least-recently-active record. None of this is a
//! source of truth; the host's tab list is.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Host-owned tab identifier.
pub type TabId = u32;

const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabRecord {
    pub tab_id: TabId,
    pub domain: String,
    pub url: String,
    pub last_active: DateTime<Utc>,
}

pub struct TabRegistry {
    records: RwLock<HashMap<TabId, TabRecord>>,
    capacity: usize,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Insert or refresh the record for a tab, stamping `last_active`.
    pub fn upsert(&self, tab_id: TabId, domain: impl Into<String>, url: impl Into<String>) {
        let mut records = self.records.write();

        records.insert(
            tab_id,
            TabRecord {
                tab_id,
                domain: domain.into(),
                url: url.into(),
                last_active: Utc::now(),
            },
        );

        if records.len() > self.capacity {
            let oldest = records
                .values()
                .filter(|r| r.tab_id != tab_id)
                .min_by_key(|r| r.last_active)
                .map(|r| r.tab_id);
            if let Some(evict) = oldest {
                records.remove(&evict);
                tracing::debug!(tab_id = evict, "Evicted least-recently-active tab record");
            }
        }
    }

    pub fn remove(&self, tab_id: TabId) -> Option<TabRecord> {
        self.records.write().remove(&tab_id)
    }

    pub fn get(&self, tab_id: TabId) -> Option<TabRecord> {
        self.records.read().get(&tab_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Evict records whose `last_active` is older than `max_age`,
    /// whether or not the host still has the tab. Returns the eviction
    /// count.
    pub fn sweep_stale(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, record| record.last_active >= cutoff);
        let evicted = before - records.len();

        if evicted > 0 {
            tracing::info!(evicted, "Swept stale tab records");
        }

        evicted
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}
