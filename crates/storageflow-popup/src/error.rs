//! Popup error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopupError {
    #[error("Invalid JSON format: {0}")]
    ParseFailure(String),

    #[error("No data found in import")]
    EmptyImport,

    #[error("No active tab")]
    NoActiveTab,

    #[error("Unknown import key: {0}")]
    UnknownImportKey(String),

    #[error("Key cannot be empty")]
    EmptyKey,

    #[error("Script execution failed: {0}")]
    Script(String),

    #[error("Store error: {0}")]
    Store(#[from] storageflow_store::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}
