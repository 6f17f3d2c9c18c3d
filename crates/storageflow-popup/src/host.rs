//! Popup host seams
//!
//! The popup does not go through the page bridge for the active tab: it
//! executes storage operations directly against the tab (the original's
//! script injection), which also lets it reach the session-scoped
//! namespace. `ScriptHost` is that seam; clipboard access and the
//! confirmation dialog get the same treatment.

use async_trait::async_trait;

use storageflow_bridge::{StorageMode, StorageSnapshot};
use storageflow_router::TabId;

use crate::Result;

#[async_trait]
pub trait ScriptHost: Send + Sync {
    async fn read_all(&self, tab: TabId, mode: StorageMode) -> Result<StorageSnapshot>;

    async fn set_item(&self, tab: TabId, mode: StorageMode, key: &str, value: &str) -> Result<()>;

    async fn remove_item(&self, tab: TabId, mode: StorageMode, key: &str) -> Result<()>;

    async fn clear(&self, tab: TabId, mode: StorageMode) -> Result<()>;
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> std::io::Result<()>;
}

/// Blocking yes/no dialog. Destructive operations ask here before any
/// mutating call is issued; a declined prompt is a clean no-op.
pub trait ConfirmationPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}
