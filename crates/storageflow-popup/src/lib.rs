//! StorageFlow Popup
//!
//! The popup surface's controller logic, minus any rendering: loading
//! and editing the active tab's snapshot through direct script
//! execution, the staged import pipeline, export and clipboard paths,
//! persisted settings, and the confirmation policy for destructive
//! operations. Rendering and event wiring are the embedding surface's
//! job; everything here is host-independent.

mod controller;
mod error;
mod host;
mod import;
mod manager;
mod settings;
#[cfg(test)]
mod testutil;

pub use controller::{ActiveTab, PopupController};
pub use error::PopupError;
pub use host::{Clipboard, ConfirmationPrompt, ScriptHost};
pub use import::{ImportOptions, ImportReport, PendingImport};
pub use manager::StorageManager;
pub use settings::{Settings, Theme};

pub type Result<T> = std::result::Result<T, PopupError>;
