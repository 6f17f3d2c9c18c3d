//! Host platform seams
//!
//! The router never talks to the browser directly; it goes through these
//! traits. `TabChannel` is the per-tab message channel (one in-flight
//! request per call site, awaited before the next). `FileSink` and
//! `Notifier` back the page actions (export downloads, user
//! notifications).

use async_trait::async_trait;

use storageflow_bridge::{BridgeRequest, BridgeResponse};

use crate::message::StorageUpdated;
use crate::registry::TabId;
use crate::Result;

/// A live tab as the host reports it.
#[derive(Debug, Clone)]
pub struct HostTab {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub active: bool,
    pub fav_icon_url: Option<String>,
}

#[async_trait]
pub trait TabChannel: Send + Sync {
    /// Enumerate all live tabs.
    async fn query_tabs(&self) -> Result<Vec<HostTab>>;

    /// One bridge round-trip: send a request to the tab's bridge and
    /// await its response. There is no timeout of our own; a hung
    /// channel resolves only when the host closes it.
    async fn request(&self, tab_id: TabId, request: BridgeRequest) -> Result<BridgeResponse>;

    /// Push a notification to a tab. The tab may have no listener;
    /// callers treat failure as ignorable.
    async fn notify(&self, tab_id: TabId, update: StorageUpdated) -> Result<()>;
}

/// Where exported files land (the host's download surface).
pub trait FileSink: Send + Sync {
    fn save(&self, filename: &str, contents: &str) -> std::io::Result<()>;
}

/// User-visible notifications (toast / system notification surface).
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}
