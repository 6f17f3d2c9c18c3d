//! Bridge wire protocol
//!
//! Requests are tagged by `action`; the action names are the original
//! extension's, and a bridge serves them against whichever namespace it
//! wraps. Responses carry the success/data/info/error shape consumers
//! expect on the other side of the channel.

use serde::{Deserialize, Serialize};

use crate::bridge::StorageInfo;
use crate::StorageSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum BridgeRequest {
    #[serde(rename = "getLocalStorage")]
    GetStorage,

    #[serde(rename = "setLocalStorageItem")]
    SetItem { key: String, value: String },

    #[serde(rename = "removeLocalStorageItem")]
    RemoveItem { key: String },

    #[serde(rename = "clearLocalStorage")]
    ClearStorage,

    #[serde(rename = "getStorageInfo")]
    GetStorageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StorageSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<StorageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            info: None,
            error: None,
        }
    }

    pub fn with_data(data: StorageSnapshot) -> Self {
        Self {
            success: true,
            data: Some(data),
            info: None,
            error: None,
        }
    }

    pub fn with_info(info: StorageInfo) -> Self {
        Self {
            success: true,
            data: None,
            info: Some(info),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            info: None,
            error: Some(error.into()),
        }
    }
}
