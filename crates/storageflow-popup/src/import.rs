//! Staged import pipeline
//!
//! A pasted, dropped, or file-loaded payload is parsed once, staged as a
//! `PendingImport`, edited per key if the user wants, and only applied
//! on confirm. Parsing accepts either an export envelope (any version —
//! the tag is advisory and never validated) or a bare key-value object.

use serde_json::Value;

use storageflow_bridge::StorageSnapshot;

use crate::error::PopupError;
use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    /// When false, keys already present in the live snapshot are
    /// skipped and counted instead of written.
    pub overwrite_existing: bool,
    /// When true, the live snapshot is exported to a timestamped backup
    /// file before any write is applied.
    pub backup_before_import: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            overwrite_existing: true,
            backup_before_import: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Import data staged for review. Keys can be renamed, revalued, or
/// dropped before the final confirm applies the rest.
#[derive(Debug, Clone)]
pub struct PendingImport {
    entries: StorageSnapshot,
}

impl PendingImport {
    /// Parse a raw JSON payload. An object with an object-valued `data`
    /// field is unwrapped as an envelope; anything else is taken as the
    /// snapshot itself. Arrays, scalars, and empty objects are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PopupError::EmptyImport);
        }

        let value: Value =
            serde_json::from_str(text).map_err(|e| PopupError::ParseFailure(e.to_string()))?;

        let inner = match value.get("data") {
            Some(data) if data.is_object() => data.clone(),
            _ => value,
        };

        let object = match inner {
            Value::Object(map) => map,
            _ => {
                return Err(PopupError::ParseFailure(
                    "expected a JSON object with key-value pairs".to_string(),
                ))
            }
        };

        let mut entries = StorageSnapshot::new();
        for (key, value) in object {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            entries.insert(key, value);
        }

        if entries.is_empty() {
            return Err(PopupError::EmptyImport);
        }

        Ok(Self { entries })
    }

    pub fn from_snapshot(entries: StorageSnapshot) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &StorageSnapshot {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Rename and/or revalue one staged entry.
    pub fn edit(&mut self, key: &str, new_key: &str, new_value: &str) -> Result<()> {
        let new_key = new_key.trim();
        if new_key.is_empty() {
            return Err(PopupError::EmptyKey);
        }
        if !self.entries.contains_key(key) {
            return Err(PopupError::UnknownImportKey(key.to_string()));
        }

        if new_key != key {
            self.entries.remove(key);
        }
        self.entries
            .insert(new_key.to_string(), new_value.to_string());
        Ok(())
    }

    /// Drop one staged entry. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }
}
