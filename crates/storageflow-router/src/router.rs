//! Message Router
//!
//! Single point of entry for inbound messages. Dispatch is total over
//! the `Message` union; responses are only produced for the kinds that
//! expect one. Failures are folded into tagged responses at this
//! boundary and never propagate to the host.

use std::sync::Arc;

use chrono::{Duration, Utc};
use url::Url;

use storageflow_bridge::{ExportEnvelope, StorageChange};
use storageflow_store::{keys, Database};

use crate::host::{FileSink, HostTab, Notifier, TabChannel};
use crate::message::{Message, Response, StorageUpdated, TabInfo, TabInfoResponse, TransferResponse};
use crate::registry::{TabId, TabRegistry};
use crate::Result;

/// Records older than this are swept from the registry.
const TAB_TTL_HOURS: i64 = 24;

pub struct Router {
    pub(crate) registry: TabRegistry,
    pub(crate) channel: Arc<dyn TabChannel>,
    pub(crate) store: Database,
}

impl Router {
    pub fn new(channel: Arc<dyn TabChannel>, store: Database) -> Self {
        Self {
            registry: TabRegistry::new(),
            channel,
            store,
        }
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    /// Seed first-run settings. Existing values are left alone.
    pub fn apply_install_defaults(&self) -> Result<()> {
        if !self.store.contains_key(keys::THEME)? {
            self.store.set_json(keys::THEME, &"auto")?;
        }
        if !self.store.contains_key(keys::CONFIRM_DELETE)? {
            self.store.set_json(keys::CONFIRM_DELETE, &true)?;
        }
        if !self.store.contains_key(keys::AUTO_BACKUP)? {
            self.store.set_json(keys::AUTO_BACKUP, &false)?;
        }
        Ok(())
    }

    /// Handle one inbound message. `sender` is the originating tab when
    /// the message came from a page bridge.
    pub async fn dispatch(&self, message: Message, sender: Option<TabId>) -> Option<Response> {
        match message {
            Message::PageReady { domain, url } => {
                if let Some(tab_id) = sender {
                    self.registry.upsert(tab_id, domain, url);
                } else {
                    tracing::warn!("pageReady without a sender tab, ignoring");
                }
                None
            }

            Message::StorageChanged {
                action,
                key,
                value,
                domain,
                timestamp,
            } => {
                tracing::info!(
                    domain = %domain,
                    action = %action,
                    key = key.as_deref().unwrap_or(""),
                    "Page storage changed"
                );

                let change = StorageChange {
                    action,
                    key,
                    value,
                    domain,
                    timestamp,
                };
                self.broadcast(change, sender).await;
                None
            }

            Message::GetTabInfo => Some(Response::Tabs(self.tab_info().await)),

            Message::TransferData {
                source_tab_id,
                target_tab_id,
                data,
            } => {
                let response = match self.transfer(source_tab_id, target_tab_id, data).await {
                    Ok(transferred) => TransferResponse::ok(transferred),
                    Err(e) => {
                        tracing::warn!(
                            target_tab_id,
                            error = %e,
                            "Cross-tab transfer failed"
                        );
                        TransferResponse::err(e.to_string())
                    }
                };
                Some(Response::Transfer(response))
            }
        }
    }

    /// Enumerate live tabs, deriving each tab's domain from its URL.
    /// Tabs whose URL cannot be parsed are dropped.
    async fn tab_info(&self) -> TabInfoResponse {
        match self.channel.query_tabs().await {
            Ok(tabs) => {
                let tabs = tabs
                    .into_iter()
                    .filter_map(|tab| {
                        let domain = host_of(&tab.url)?;
                        Some(TabInfo {
                            id: tab.id,
                            title: tab.title,
                            domain,
                            url: tab.url,
                            active: tab.active,
                            fav_icon_url: tab.fav_icon_url,
                        })
                    })
                    .collect();
                TabInfoResponse::ok(tabs)
            }
            Err(e) => TabInfoResponse::err(e.to_string()),
        }
    }

    /// Push `storageUpdated` to every other tab on the change's domain.
    /// Scheme-agnostic: only the URL host is compared. Delivery failures
    /// are ignored; a tab with no listener never blocks the loop.
    pub async fn broadcast(&self, change: StorageChange, origin: Option<TabId>) {
        let tabs = match self.channel.query_tabs().await {
            Ok(tabs) => tabs,
            Err(e) => {
                tracing::debug!(error = %e, "Tab query failed, skipping broadcast");
                return;
            }
        };

        let update = StorageUpdated::from(change);
        for tab in tabs {
            if Some(tab.id) == origin {
                continue;
            }
            if host_of(&tab.url).as_deref() != Some(update.domain.as_str()) {
                continue;
            }
            if let Err(e) = self.channel.notify(tab.id, update.clone()).await {
                // Tab might not have a listener, ignore
                tracing::debug!(tab_id = tab.id, error = %e, "storageUpdated not delivered");
            }
        }
    }

    /// Navigation completed in a tab: refresh its record.
    pub fn handle_navigation_committed(&self, tab_id: TabId, url: &str) {
        match host_of(url) {
            Some(domain) => self.registry.upsert(tab_id, domain, url),
            // Invalid URL, ignore
            None => {}
        }
    }

    pub fn handle_tab_removed(&self, tab_id: TabId) {
        self.registry.remove(tab_id);
    }

    /// Evict registry records idle beyond the TTL. Meant to run hourly.
    pub fn sweep_stale_tabs(&self) -> usize {
        self.registry.sweep_stale(Duration::hours(TAB_TTL_HOURS))
    }

    async fn find_tab(&self, tab_id: TabId) -> Result<HostTab> {
        let tabs = self.channel.query_tabs().await?;
        tabs.into_iter()
            .find(|tab| tab.id == tab_id)
            .ok_or(crate::RouterError::TabNotFound(tab_id))
    }

    /// Context-menu action: export a tab's storage to a download and
    /// notify the user. Failures surface as a notification, not an
    /// error.
    pub async fn export_page_storage(
        &self,
        tab_id: TabId,
        sink: &dyn FileSink,
        notifier: &dyn Notifier,
    ) {
        let exported: Result<usize> = async {
            let tab = self.find_tab(tab_id).await?;
            let domain =
                host_of(&tab.url).ok_or(crate::RouterError::TabNotFound(tab_id))?;

            let response = self
                .channel
                .request(tab_id, storageflow_bridge::BridgeRequest::GetStorage)
                .await?;
            if !response.success {
                return Err(crate::RouterError::Unreachable(tab_id));
            }

            let data = response.data.unwrap_or_default();
            let count = data.len();
            let envelope = ExportEnvelope::legacy(data, domain.clone());
            let filename = format!(
                "local-storage-{}-{}.json",
                domain,
                Utc::now().format("%Y-%m-%d")
            );
            sink.save(&filename, &envelope.to_pretty_json()?)
                .map_err(|e| crate::RouterError::Channel(e.to_string()))?;

            notifier.notify(
                "Export Complete",
                &format!("Exported {} items from {}", count, domain),
            );
            Ok(count)
        }
        .await;

        if let Err(e) = exported {
            tracing::warn!(tab_id, error = %e, "Page storage export failed");
            notifier.notify("Export Failed", "Could not export local storage data");
        }
    }

    /// Context-menu action: clear a tab's storage and notify the user.
    pub async fn clear_page_storage(
        &self,
        tab_id: TabId,
        notifier: &dyn Notifier,
    ) {
        let cleared: Result<String> = async {
            let tab = self.find_tab(tab_id).await?;
            let domain =
                host_of(&tab.url).ok_or(crate::RouterError::TabNotFound(tab_id))?;

            let response = self
                .channel
                .request(tab_id, storageflow_bridge::BridgeRequest::ClearStorage)
                .await?;
            if !response.success {
                return Err(crate::RouterError::Unreachable(tab_id));
            }
            Ok(domain)
        }
        .await;

        match cleared {
            Ok(domain) => notifier.notify(
                "Storage Cleared",
                &format!("Local storage cleared for {}", domain),
            ),
            Err(e) => {
                tracing::warn!(tab_id, error = %e, "Page storage clear failed");
                notifier.notify("Clear Failed", "Could not clear local storage");
            }
        }
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
