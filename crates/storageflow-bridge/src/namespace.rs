//! Storage namespaces
//!
//! `StorageNamespace` is the seam to the host's per-page storage object.
//! `ObservedNamespace` instruments any namespace so that every mutation,
//! whoever performed it, reaches the registered change listeners — the
//! page and the bridge share the same observed handle, so the bridge sees
//! mutations it did not initiate.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::change::StorageChange;
use crate::error::BridgeError;
use crate::{Result, StorageSnapshot};

/// One page's key-value storage namespace (persistent or session-scoped).
/// Methods take `&self`: handles are shared and backends use interior
/// mutability.
pub trait StorageNamespace: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Write a pair. Fails with `QuotaExceeded` when the backend enforces
    /// a byte quota and this write would cross it.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Absent keys are not an error.
    fn remove(&self, key: &str);

    fn clear(&self);

    fn keys(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> StorageSnapshot {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }
}

/// In-memory namespace, with an optional byte quota over the UTF-8 size
/// of all keys and values.
pub struct MemoryNamespace {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryNamespace {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: None,
        }
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn used_bytes(entries: &HashMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Default for MemoryNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageNamespace for MemoryNamespace {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();

        if let Some(quota) = self.quota_bytes {
            let current = Self::used_bytes(&entries);
            let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let projected = current - replaced + key.len() + value.len();
            if projected > quota {
                return Err(BridgeError::QuotaExceeded);
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

pub type ChangeListener = Box<dyn Fn(&StorageChange) + Send + Sync>;

/// A namespace wrapper that notifies listeners after every successful
/// mutation. Listeners are registered up front (at bridge construction);
/// notification is synchronous, after the mutation has committed.
pub struct ObservedNamespace {
    inner: Arc<dyn StorageNamespace>,
    domain: String,
    listeners: RwLock<Vec<ChangeListener>>,
}

impl ObservedNamespace {
    pub fn new(inner: Arc<dyn StorageNamespace>, domain: impl Into<String>) -> Self {
        Self {
            inner,
            domain: domain.into(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&StorageChange) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    fn notify(&self, change: StorageChange) {
        tracing::debug!(
            domain = %change.domain,
            action = %change.action,
            key = change.key.as_deref().unwrap_or(""),
            "Storage mutation observed"
        );

        for listener in self.listeners.read().iter() {
            listener(&change);
        }
    }
}

impl StorageNamespace for ObservedNamespace {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value)?;
        self.notify(StorageChange::set(key, value, &self.domain));
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
        self.notify(StorageChange::remove(key, &self.domain));
    }

    fn clear(&self) {
        self.inner.clear();
        self.notify(StorageChange::clear(&self.domain));
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeAction;
    use parking_lot::Mutex;

    #[test]
    fn test_set_then_get_exact_value() {
        let ns = MemoryNamespace::new();
        ns.set("count", "42").unwrap();
        // String in, string out, no coercion
        assert_eq!(ns.get("count").as_deref(), Some("42"));
    }

    #[test]
    fn test_clear_empties_namespace() {
        let ns = MemoryNamespace::new();
        ns.set("a", "1").unwrap();
        ns.set("b", "2").unwrap();
        ns.clear();
        assert!(ns.is_empty());
        assert!(ns.snapshot().is_empty());
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let ns = MemoryNamespace::new();
        ns.remove("ghost");
        assert!(ns.is_empty());
    }

    #[test]
    fn test_quota_enforced() {
        let ns = MemoryNamespace::with_quota(8);
        ns.set("ab", "cd").unwrap();
        let err = ns.set("ef", "too-long".repeat(2).as_str()).unwrap_err();
        assert!(matches!(err, BridgeError::QuotaExceeded));
        // Overwriting within quota still works
        ns.set("ab", "xy").unwrap();
    }

    #[test]
    fn test_observer_sees_native_mutations() {
        let observed = Arc::new(ObservedNamespace::new(
            Arc::new(MemoryNamespace::new()),
            "example.com",
        ));
        let seen: Arc<Mutex<Vec<StorageChange>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        observed.subscribe(move |change| sink.lock().push(change.clone()));

        // The "page" mutates through the shared handle, not through the bridge
        observed.set("token", "abc").unwrap();
        observed.remove("token");
        observed.clear();

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].action, ChangeAction::Set);
        assert_eq!(seen[0].value.as_deref(), Some("abc"));
        assert_eq!(seen[1].action, ChangeAction::Remove);
        assert_eq!(seen[2].action, ChangeAction::Clear);
        assert!(seen[2].key.is_none());
    }

    #[test]
    fn test_failed_set_does_not_notify() {
        let observed = ObservedNamespace::new(Arc::new(MemoryNamespace::with_quota(2)), "x");
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        observed.subscribe(move |_| *sink.lock() += 1);

        assert!(observed.set("key", "far-too-long").is_err());
        assert_eq!(*seen.lock(), 0);
    }
}
