//! In-memory host fakes shared across the router tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use storageflow_bridge::{
    BridgeRequest, BridgeResponse, MemoryNamespace, ObservedNamespace, PageOrigin, StorageBridge,
    StorageNamespace,
};

use crate::host::{FileSink, HostTab, Notifier, TabChannel};
use crate::message::StorageUpdated;
use crate::registry::TabId;
use crate::{Result, RouterError};

/// Fake host: a tab list plus real bridges wired to in-memory
/// namespaces. Tabs added without a bridge behave like pages with no
/// content script listening.
pub struct FakeTabs {
    tabs: Mutex<Vec<HostTab>>,
    bridges: Mutex<HashMap<TabId, Arc<StorageBridge>>>,
    delivered: Mutex<Vec<(TabId, StorageUpdated)>>,
}

impl FakeTabs {
    pub fn new() -> Self {
        Self {
            tabs: Mutex::new(Vec::new()),
            bridges: Mutex::new(HashMap::new()),
            delivered: Mutex::new(Vec::new()),
        }
    }

    fn domain_of(url: &str) -> String {
        url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    fn push_tab(&self, id: TabId, title: &str, url: &str, active: bool) {
        self.tabs.lock().push(HostTab {
            id,
            title: title.to_string(),
            url: url.to_string(),
            active,
            fav_icon_url: None,
        });
    }

    fn attach_bridge(&self, id: TabId, url: &str, namespace: Arc<dyn StorageNamespace>) {
        let domain = Self::domain_of(url);
        let observed = Arc::new(ObservedNamespace::new(namespace, domain.clone()));
        let bridge = Arc::new(StorageBridge::new(observed, PageOrigin::new(domain, url)));
        self.bridges.lock().insert(id, bridge);
    }

    /// A tab with a live bridge.
    pub fn add_tab(&self, id: TabId, url: &str, active: bool) {
        self.attach_bridge(id, url, Arc::new(MemoryNamespace::new()));
        self.push_tab(id, &format!("Tab {}", id), url, active);
    }

    /// A tab whose namespace enforces a byte quota.
    pub fn add_tab_with_quota(&self, id: TabId, url: &str, quota: usize) {
        self.attach_bridge(id, url, Arc::new(MemoryNamespace::with_quota(quota)));
        self.push_tab(id, &format!("Tab {}", id), url, false);
    }

    /// A tab with no bridge (no listener on the other end).
    pub fn add_plain_tab(&self, id: TabId, title: &str, url: &str, active: bool) {
        self.push_tab(id, title, url, active);
    }

    pub fn bridge(&self, id: TabId) -> Arc<StorageBridge> {
        self.bridges
            .lock()
            .get(&id)
            .cloned()
            .expect("no bridge for tab")
    }

    pub fn delivered(&self) -> Vec<(TabId, StorageUpdated)> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl TabChannel for FakeTabs {
    async fn query_tabs(&self) -> Result<Vec<HostTab>> {
        Ok(self.tabs.lock().clone())
    }

    async fn request(&self, tab_id: TabId, request: BridgeRequest) -> Result<BridgeResponse> {
        let bridge = self.bridges.lock().get(&tab_id).cloned();
        match bridge {
            Some(bridge) => Ok(bridge.handle(request)),
            None => Err(RouterError::Unreachable(tab_id)),
        }
    }

    async fn notify(&self, tab_id: TabId, update: StorageUpdated) -> Result<()> {
        if !self.bridges.lock().contains_key(&tab_id) {
            return Err(RouterError::Unreachable(tab_id));
        }
        self.delivered.lock().push((tab_id, update));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    files: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn files(&self) -> Vec<(String, String)> {
        self.files.lock().clone()
    }
}

impl FileSink for RecordingSink {
    fn save(&self, filename: &str, contents: &str) -> std::io::Result<()> {
        self.files
            .lock()
            .push((filename.to_string(), contents.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn notes(&self) -> Vec<(String, String)> {
        self.notes.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.notes
            .lock()
            .push((title.to_string(), message.to_string()));
    }
}
