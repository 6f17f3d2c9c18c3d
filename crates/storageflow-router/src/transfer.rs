//! Transfer Coordinator
//!
//! Cross-tab data moves: resolve the effective snapshot (explicit
//! payload wins over a live source read), write it to the target one key
//! at a time, then log the operation. Writes are issued sequentially and
//! each is awaited before the next — per-key ordering and observable
//! partial failure are the contract here, not an accident. A failed
//! write aborts the rest; already-applied writes stay applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storageflow_bridge::{BridgeRequest, StorageSnapshot};
use storageflow_store::keys;

use crate::registry::TabId;
use crate::router::Router;
use crate::{Result, RouterError};

/// The transfer log keeps this many entries, newest first.
pub const TRANSFER_LOG_CAPACITY: usize = 50;

const TRANSFER_KIND: &str = "cross-tab-transfer";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferLogEntry {
    pub kind: String,
    #[serde(
        rename = "sourceTabId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_tab_id: Option<TabId>,
    #[serde(rename = "targetTabId")]
    pub target_tab_id: TabId,
    #[serde(rename = "itemCount")]
    pub item_count: usize,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl TransferLogEntry {
    pub fn new(source_tab_id: Option<TabId>, target_tab_id: TabId, item_count: usize) -> Self {
        Self {
            kind: TRANSFER_KIND.to_string(),
            source_tab_id,
            target_tab_id,
            item_count,
            timestamp: Utc::now(),
        }
    }
}

impl Router {
    /// Move a snapshot into `target_tab_id`. Returns the number of keys
    /// written.
    ///
    /// With `source_tab_id`, the source bridge is read first; a supplied
    /// `data` payload still takes precedence over that read. Without a
    /// source, `data` must carry the snapshot. An empty effective
    /// snapshot is `NoData` and has no effect on the target.
    pub async fn transfer(
        &self,
        source_tab_id: Option<TabId>,
        target_tab_id: TabId,
        data: Option<StorageSnapshot>,
    ) -> Result<usize> {
        let effective = match source_tab_id {
            Some(source) => {
                let response = self
                    .channel
                    .request(source, BridgeRequest::GetStorage)
                    .await
                    .map_err(|_| RouterError::SourceUnreachable(source))?;
                if !response.success {
                    return Err(RouterError::SourceUnreachable(source));
                }
                // Explicit payload overrides the live read
                match data {
                    Some(data) => data,
                    None => response.data.unwrap_or_default(),
                }
            }
            None => data.unwrap_or_default(),
        };

        if effective.is_empty() {
            return Err(RouterError::NoData);
        }

        let mut transferred = 0usize;
        for (key, value) in &effective {
            let response = self
                .channel
                .request(
                    target_tab_id,
                    BridgeRequest::SetItem {
                        key: key.clone(),
                        value: value.clone(),
                    },
                )
                .await
                .map_err(|e| RouterError::WriteFailure {
                    key: key.clone(),
                    message: e.to_string(),
                })?;

            if !response.success {
                return Err(RouterError::WriteFailure {
                    key: key.clone(),
                    message: response
                        .error
                        .unwrap_or_else(|| "write rejected".to_string()),
                });
            }
            transferred += 1;
        }

        self.append_transfer_log(TransferLogEntry::new(
            source_tab_id,
            target_tab_id,
            transferred,
        ))?;

        tracing::info!(
            ?source_tab_id,
            target_tab_id,
            transferred,
            "Cross-tab transfer complete"
        );

        Ok(transferred)
    }

    /// Read-modify-write append against the durable store; oldest
    /// entries fall off past the capacity. Not atomic across writers —
    /// the log is diagnostic data.
    pub(crate) fn append_transfer_log(&self, entry: TransferLogEntry) -> Result<()> {
        let mut logs: Vec<TransferLogEntry> = self
            .store
            .get_json(keys::TRANSFER_LOGS)?
            .unwrap_or_default();

        logs.insert(0, entry);
        logs.truncate(TRANSFER_LOG_CAPACITY);

        self.store.set_json(keys::TRANSFER_LOGS, &logs)?;
        Ok(())
    }

    pub fn transfer_log(&self) -> Result<Vec<TransferLogEntry>> {
        Ok(self
            .store
            .get_json(keys::TRANSFER_LOGS)?
            .unwrap_or_default())
    }
}
