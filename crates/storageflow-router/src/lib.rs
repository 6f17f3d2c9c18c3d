//! StorageFlow Router
//!
//! The privileged, page-independent side of the system: receives typed
//! messages from bridges and UI surfaces, dispatches by message kind,
//! tracks per-tab metadata, relays storage changes to same-domain
//! siblings, and orchestrates cross-tab transfers.

mod error;
mod host;
mod message;
mod registry;
mod router;
#[cfg(test)]
mod testutil;
mod transfer;

pub use error::RouterError;
pub use host::{FileSink, HostTab, Notifier, TabChannel};
pub use message::{
    Message, Response, StorageUpdated, TabInfo, TabInfoResponse, TransferResponse,
};
pub use registry::{TabId, TabRecord, TabRegistry};
pub use router::Router;
pub use transfer::{TransferLogEntry, TRANSFER_LOG_CAPACITY};

pub type Result<T> = std::result::Result<T, RouterError>;
