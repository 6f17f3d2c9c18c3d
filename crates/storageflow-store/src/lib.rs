//! StorageFlow Store
//!
//! SQLite-backed key-value persistence for extension-owned state:
//! settings and the bounded transfer log. This is the durable store the
//! router and popup share; page storage itself never lands here.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StoreError;

/// Durable keys used by the rest of the workspace.
pub mod keys {
    pub const TRANSFER_LOGS: &str = "transferLogs";
    pub const THEME: &str = "theme";
    pub const CONFIRM_DELETE: &str = "storageflow_confirmDelete";
    pub const AUTO_BACKUP: &str = "storageflow_autoBackup";
}

pub type Result<T> = std::result::Result<T, StoreError>;
