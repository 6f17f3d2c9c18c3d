//! In-memory host fakes shared across the popup tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use storageflow_bridge::{StorageMode, StorageSnapshot};
use storageflow_router::{FileSink, TabId};

use crate::host::{Clipboard, ConfirmationPrompt, ScriptHost};
use crate::Result;

/// Script host over in-memory namespaces, keyed by tab and mode.
pub struct MemoryScriptHost {
    data: Mutex<HashMap<(TabId, StorageMode), StorageSnapshot>>,
}

impl MemoryScriptHost {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, tab: TabId, mode: StorageMode, key: &str) -> Option<String> {
        self.data
            .lock()
            .get(&(tab, mode))
            .and_then(|ns| ns.get(key).cloned())
    }

    pub fn wipe(&self, tab: TabId, mode: StorageMode) {
        self.data.lock().remove(&(tab, mode));
    }
}

#[async_trait]
impl ScriptHost for MemoryScriptHost {
    async fn read_all(&self, tab: TabId, mode: StorageMode) -> Result<StorageSnapshot> {
        Ok(self
            .data
            .lock()
            .get(&(tab, mode))
            .cloned()
            .unwrap_or_default())
    }

    async fn set_item(&self, tab: TabId, mode: StorageMode, key: &str, value: &str) -> Result<()> {
        self.data
            .lock()
            .entry((tab, mode))
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, tab: TabId, mode: StorageMode, key: &str) -> Result<()> {
        if let Some(ns) = self.data.lock().get_mut(&(tab, mode)) {
            ns.remove(key);
        }
        Ok(())
    }

    async fn clear(&self, tab: TabId, mode: StorageMode) -> Result<()> {
        self.data.lock().remove(&(tab, mode));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    texts: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> std::io::Result<()> {
        self.texts.lock().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    files: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn files(&self) -> Vec<(String, String)> {
        self.files.lock().clone()
    }
}

impl FileSink for RecordingSink {
    fn save(&self, filename: &str, contents: &str) -> std::io::Result<()> {
        self.files
            .lock()
            .push((filename.to_string(), contents.to_string()));
        Ok(())
    }
}

/// Prompt that answers from a scripted queue; an exhausted queue
/// declines.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<usize>,
}

impl ScriptedPrompt {
    pub fn script(&self, answers: &[bool]) {
        *self.answers.lock() = answers.iter().copied().collect();
    }

    pub fn asked(&self) -> usize {
        *self.asked.lock()
    }
}

impl ConfirmationPrompt for ScriptedPrompt {
    fn confirm(&self, _message: &str) -> bool {
        *self.asked.lock() += 1;
        self.answers.lock().pop_front().unwrap_or(false)
    }
}
