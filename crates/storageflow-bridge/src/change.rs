//! Storage change events
//!
//! Emitted after every mutation of an observed namespace. The same shape
//! travels to the router as the `storageChanged` message payload and back
//! out to sibling tabs as `storageUpdated`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Set,
    Remove,
    Clear,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Set => "set",
            ChangeAction::Remove => "remove",
            ChangeAction::Clear => "clear",
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageChange {
    pub action: ChangeAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub domain: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl StorageChange {
    pub fn set(key: &str, value: &str, domain: &str) -> Self {
        Self {
            action: ChangeAction::Set,
            key: Some(key.to_string()),
            value: Some(value.to_string()),
            domain: domain.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn remove(key: &str, domain: &str) -> Self {
        Self {
            action: ChangeAction::Remove,
            key: Some(key.to_string()),
            value: None,
            domain: domain.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn clear(domain: &str) -> Self {
        Self {
            action: ChangeAction::Clear,
            key: None,
            value: None,
            domain: domain.to_string(),
            timestamp: Utc::now(),
        }
    }
}
