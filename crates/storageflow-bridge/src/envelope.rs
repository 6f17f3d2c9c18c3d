//! Export/import envelope
//!
//! The JSON wrapper written on export and accepted (optionally) on
//! import. Only `data` is load-bearing; version, timestamp, domain and
//! mode are advisory metadata and are never validated on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::StorageSnapshot;

pub const ENVELOPE_VERSION: &str = "2.0";
pub const ENVELOPE_VERSION_LEGACY: &str = "1.0";

/// Which page namespace a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageMode {
    #[serde(rename = "localStorage")]
    Local,
    #[serde(rename = "sessionStorage")]
    Session,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Local => "localStorage",
            StorageMode::Session => "sessionStorage",
        }
    }
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEnvelope {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub domain: String,
    #[serde(
        rename = "storageMode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_mode: Option<StorageMode>,
    pub data: StorageSnapshot,
}

impl ExportEnvelope {
    /// Current envelope, as written by the popup's export paths.
    pub fn new(data: StorageSnapshot, domain: impl Into<String>, mode: StorageMode) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            timestamp: Utc::now(),
            domain: domain.into(),
            storage_mode: Some(mode),
            data,
        }
    }

    /// Legacy envelope, as written by the background page action (no
    /// storage mode field).
    pub fn legacy(data: StorageSnapshot, domain: impl Into<String>) -> Self {
        Self {
            version: ENVELOPE_VERSION_LEGACY.to_string(),
            timestamp: Utc::now(),
            domain: domain.into(),
            storage_mode: None,
            data,
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
