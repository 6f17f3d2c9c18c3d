//! Router error types

use thiserror::Error;

use crate::registry::TabId;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Source tab {0} is unreachable")]
    SourceUnreachable(TabId),

    #[error("No data to transfer")]
    NoData,

    #[error("Write failed for key '{key}': {message}")]
    WriteFailure { key: String, message: String },

    #[error("Tab {0} is unreachable")]
    Unreachable(TabId),

    #[error("Tab {0} not found")]
    TabNotFound(TabId),

    #[error("Store error: {0}")]
    Store(#[from] storageflow_store::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Channel error: {0}")]
    Channel(String),
}
