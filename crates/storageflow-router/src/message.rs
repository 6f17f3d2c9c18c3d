//! Router message contracts
//!
//! The inbound union is tagged by `type`. `pageReady` and
//! `storageChanged` are fire-and-forget; `getTabInfo` and `transferData`
//! expect a response. `storageUpdated` is the outbound best-effort push
//! to sibling tabs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storageflow_bridge::{ChangeAction, StorageChange, StorageSnapshot};

use crate::registry::TabId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "pageReady")]
    PageReady { domain: String, url: String },

    #[serde(rename = "storageChanged")]
    StorageChanged {
        action: ChangeAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        domain: String,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "getTabInfo")]
    GetTabInfo,

    #[serde(rename = "transferData")]
    TransferData {
        #[serde(
            rename = "sourceTabId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        source_tab_id: Option<TabId>,
        #[serde(rename = "targetTabId")]
        target_tab_id: TabId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<StorageSnapshot>,
    },
}

impl Message {
    pub fn storage_changed(change: StorageChange) -> Self {
        Message::StorageChanged {
            action: change.action,
            key: change.key,
            value: change.value,
            domain: change.domain,
            timestamp: change.timestamp,
        }
    }
}

/// Pushed to sibling tabs on the same domain after a storage change.
/// Delivery is best-effort; a tab with no listener is silently skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "storageUpdated")]
pub struct StorageUpdated {
    pub action: ChangeAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub domain: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl From<StorageChange> for StorageUpdated {
    fn from(change: StorageChange) -> Self {
        Self {
            action: change.action,
            key: change.key,
            value: change.value,
            domain: change.domain,
            timestamp: change.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    pub title: String,
    pub domain: String,
    pub url: String,
    pub active: bool,
    #[serde(rename = "favIconUrl", default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabInfoResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<TabInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TabInfoResponse {
    pub fn ok(tabs: Vec<TabInfo>) -> Self {
        Self {
            success: true,
            tabs,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tabs: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferred: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferResponse {
    pub fn ok(transferred: usize) -> Self {
        Self {
            success: true,
            transferred: Some(transferred),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            transferred: None,
            error: Some(error.into()),
        }
    }
}

/// What `Router::dispatch` hands back for the message kinds that expect
/// a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Tabs(TabInfoResponse),
    Transfer(TransferResponse),
}
