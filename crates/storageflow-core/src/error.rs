//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Store error: {0}")]
    Store(#[from] storageflow_store::StoreError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] storageflow_bridge::BridgeError),

    #[error("Router error: {0}")]
    Router(#[from] storageflow_router::RouterError),

    #[error("Popup error: {0}")]
    Popup(#[from] storageflow_popup::PopupError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
