//! StorageFlow Core
//!
//! Central wiring for the page-storage inspector: opens the durable
//! store, seeds install defaults, owns the router, and runs the
//! periodic tab sweep. Host surfaces (popup, background shell) build on
//! the re-exports below.

mod app;
mod config;
mod error;

pub use app::App;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use storageflow_bridge::{
    BridgeError, BridgeRequest, BridgeResponse, ChangeAction, ExportEnvelope, MemoryNamespace,
    ObservedNamespace, PageOrigin, StorageBridge, StorageChange, StorageInfo, StorageMode,
    StorageNamespace, StorageSnapshot,
};
pub use storageflow_popup::{
    ActiveTab, Clipboard, ConfirmationPrompt, ImportOptions, ImportReport, PendingImport,
    PopupController, PopupError, ScriptHost, Settings, StorageManager, Theme,
};
pub use storageflow_router::{
    FileSink, HostTab, Message, Notifier, Response, Router, RouterError, StorageUpdated, TabChannel,
    TabId, TabInfo, TabRecord, TabRegistry, TransferLogEntry, TRANSFER_LOG_CAPACITY,
};
pub use storageflow_store::{Database, StoreError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
