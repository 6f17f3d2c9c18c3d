//! StorageFlow Bridge
//!
//! The in-page side of the system: wraps one page's key-value storage
//! namespace, serves the popup/router request protocol against it, and
//! emits a change event after every mutation — including mutations the
//! page performs natively through the shared namespace handle.

mod bridge;
mod change;
mod envelope;
mod error;
mod namespace;
mod protocol;

pub use bridge::{PageOrigin, StorageBridge, StorageInfo};
pub use change::{ChangeAction, StorageChange};
pub use envelope::{
    ExportEnvelope, StorageMode, ENVELOPE_VERSION, ENVELOPE_VERSION_LEGACY,
};
pub use error::BridgeError;
pub use namespace::{MemoryNamespace, ObservedNamespace, StorageNamespace};
pub use protocol::{BridgeRequest, BridgeResponse};

use std::collections::HashMap;

/// Full contents of one storage namespace at one instant. Transient:
/// passed between bridge and consumers, never persisted by the router.
pub type StorageSnapshot = HashMap<String, String>;

pub type Result<T> = std::result::Result<T, BridgeError>;
