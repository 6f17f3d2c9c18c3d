//! Popup controller
//!
//! Owns the popup's working state: the active tab, the selected storage
//! mode, the cached snapshot, and the search term. Every mutating path
//! goes through the script host and ends with a reload so the cached
//! snapshot tracks the page.

use std::sync::Arc;

use chrono::Utc;

use storageflow_bridge::{ExportEnvelope, StorageMode, StorageSnapshot};
use storageflow_router::{FileSink, TabId};
use storageflow_store::Database;

use crate::host::{Clipboard, ConfirmationPrompt, ScriptHost};
use crate::import::{ImportOptions, ImportReport, PendingImport};
use crate::manager::StorageManager;
use crate::settings::Settings;
use crate::{PopupError, Result};

#[derive(Debug, Clone)]
pub struct ActiveTab {
    pub id: TabId,
    pub domain: String,
    pub url: String,
}

pub struct PopupController {
    manager: StorageManager,
    settings: Settings,
    clipboard: Arc<dyn Clipboard>,
    sink: Arc<dyn FileSink>,
    prompt: Arc<dyn ConfirmationPrompt>,
    mode: StorageMode,
    tab: Option<ActiveTab>,
    snapshot: StorageSnapshot,
    search_term: String,
}

impl PopupController {
    pub fn new(
        host: Arc<dyn ScriptHost>,
        store: Database,
        clipboard: Arc<dyn Clipboard>,
        sink: Arc<dyn FileSink>,
        prompt: Arc<dyn ConfirmationPrompt>,
    ) -> Self {
        Self {
            manager: StorageManager::new(host),
            settings: Settings::new(store),
            clipboard,
            sink,
            prompt,
            mode: StorageMode::Local,
            tab: None,
            snapshot: StorageSnapshot::new(),
            search_term: String::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_active_tab(&mut self, tab: Option<ActiveTab>) {
        self.tab = tab;
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub async fn switch_mode(&mut self, mode: StorageMode) -> Result<()> {
        self.mode = mode;
        self.reload().await
    }

    fn active_tab(&self) -> Result<&ActiveTab> {
        self.tab.as_ref().ok_or(PopupError::NoActiveTab)
    }

    fn domain(&self) -> String {
        self.tab
            .as_ref()
            .map(|t| t.domain.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Refresh the cached snapshot from the page. Without an active tab
    /// there is nothing to load and the cache goes empty.
    pub async fn reload(&mut self) -> Result<()> {
        match &self.tab {
            Some(tab) => {
                self.snapshot = self.manager.load(tab.id, self.mode).await?;
            }
            None => self.snapshot.clear(),
        }
        Ok(())
    }

    pub fn snapshot(&self) -> &StorageSnapshot {
        &self.snapshot
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn clear_search(&mut self) {
        self.search_term.clear();
    }

    /// The snapshot as currently displayed (search filter applied).
    pub fn filtered(&self) -> StorageSnapshot {
        StorageManager::filter(&self.snapshot, &self.search_term)
    }

    /// Displayed key count and formatted total size.
    pub fn stats(&self) -> (usize, String) {
        let data = self.filtered();
        let size = serde_json::to_string(&data).map(|s| s.len()).unwrap_or(0);
        (data.len(), StorageManager::format_size(size))
    }

    pub async fn save_item(&mut self, key: &str, value: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(PopupError::EmptyKey);
        }
        let tab_id = self.active_tab()?.id;
        self.manager.set(tab_id, self.mode, key, value).await?;
        self.reload().await
    }

    /// Delete one key. Honors the confirm-delete setting; a declined
    /// prompt returns Ok(false) with nothing issued.
    pub async fn delete_item(&mut self, key: &str) -> Result<bool> {
        if self.settings.confirm_delete()?
            && !self.prompt.confirm(&format!("Delete \"{}\"?", key))
        {
            return Ok(false);
        }

        let tab_id = self.active_tab()?.id;
        self.manager.remove(tab_id, self.mode, key).await?;
        self.reload().await?;
        Ok(true)
    }

    /// Bulk delete. One confirmation for the whole batch.
    pub async fn delete_selected(&mut self, keys: &[String]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        if !self
            .prompt
            .confirm(&format!("Delete {} selected items?", keys.len()))
        {
            return Ok(0);
        }

        let tab_id = self.active_tab()?.id;
        let mut deleted = 0;
        for key in keys {
            self.manager.remove(tab_id, self.mode, key).await?;
            deleted += 1;
        }
        self.reload().await?;
        Ok(deleted)
    }

    /// Clear the whole namespace. Requires two sequential confirmations
    /// before any mutating call is issued.
    pub async fn clear_all(&mut self) -> Result<bool> {
        let warning = format!(
            "This will permanently delete ALL {} data for this website. Continue?",
            self.mode
        );
        if !self.prompt.confirm(&warning) {
            return Ok(false);
        }
        if !self
            .prompt
            .confirm("FINAL WARNING: you are about to delete ALL storage data. Proceed?")
        {
            return Ok(false);
        }

        let tab_id = self.active_tab()?.id;
        self.manager.clear(tab_id, self.mode).await?;
        self.reload().await?;
        Ok(true)
    }

    fn envelope(&self, data: StorageSnapshot) -> ExportEnvelope {
        ExportEnvelope::new(data, self.domain(), self.mode)
    }

    fn export_with_prefix(&self, data: StorageSnapshot, prefix: &str) -> Result<String> {
        let filename = format!("{}-{}.json", prefix, Utc::now().format("%Y-%m-%d"));
        let json = self.envelope(data).to_pretty_json()?;
        self.sink.save(&filename, &json)?;
        tracing::info!(filename = %filename, "Exported storage snapshot");
        Ok(filename)
    }

    /// Export the full snapshot. Returns the file name handed to the
    /// sink.
    pub fn export_all(&self) -> Result<String> {
        self.export_with_prefix(self.snapshot.clone(), "all-data")
    }

    pub fn export_selected(&self, keys: &[String]) -> Result<String> {
        self.export_with_prefix(self.subset(keys), "storageflow")
    }

    pub fn copy_all(&self) -> Result<()> {
        let json = self.envelope(self.snapshot.clone()).to_pretty_json()?;
        self.clipboard.write_text(&json)?;
        Ok(())
    }

    pub fn copy_selected(&self, keys: &[String]) -> Result<()> {
        let json = self.envelope(self.subset(keys)).to_pretty_json()?;
        self.clipboard.write_text(&json)?;
        Ok(())
    }

    fn subset(&self, keys: &[String]) -> StorageSnapshot {
        keys.iter()
            .filter_map(|key| {
                self.snapshot
                    .get(key)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect()
    }

    /// Parse a raw payload (file contents, paste, drop) into a staged
    /// import.
    pub fn begin_import(&self, text: &str) -> Result<PendingImport> {
        PendingImport::parse(text)
    }

    /// Apply a staged import. Writes are sequential per key; with
    /// overwrite off, keys already live are skipped and counted. The
    /// optional backup exports the pre-import snapshot first.
    pub async fn confirm_import(
        &mut self,
        pending: &PendingImport,
        options: ImportOptions,
    ) -> Result<ImportReport> {
        if pending.is_empty() {
            return Err(PopupError::EmptyImport);
        }
        let tab_id = self.active_tab()?.id;

        if options.backup_before_import {
            let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S");
            self.export_with_prefix(self.snapshot.clone(), &format!("backup-{}", stamp))?;
        }

        let mut imported = 0;
        let mut skipped = 0;
        for (key, value) in pending.entries() {
            if !options.overwrite_existing && self.snapshot.contains_key(key) {
                skipped += 1;
                continue;
            }
            self.manager.set(tab_id, self.mode, key, value).await?;
            imported += 1;
        }

        self.reload().await?;

        tracing::info!(imported, skipped, "Import applied");
        Ok(ImportReport { imported, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MemoryScriptHost, RecordingClipboard, RecordingSink, ScriptedPrompt};

    struct Fixture {
        controller: PopupController,
        host: Arc<MemoryScriptHost>,
        clipboard: Arc<RecordingClipboard>,
        sink: Arc<RecordingSink>,
        prompt: Arc<ScriptedPrompt>,
    }

    fn fixture() -> Fixture {
        let host = Arc::new(MemoryScriptHost::new());
        let clipboard = Arc::new(RecordingClipboard::default());
        let sink = Arc::new(RecordingSink::default());
        let prompt = Arc::new(ScriptedPrompt::default());

        let mut controller = PopupController::new(
            Arc::clone(&host) as Arc<dyn ScriptHost>,
            Database::open_in_memory().unwrap(),
            Arc::clone(&clipboard) as Arc<dyn Clipboard>,
            Arc::clone(&sink) as Arc<dyn FileSink>,
            Arc::clone(&prompt) as Arc<dyn ConfirmationPrompt>,
        );
        controller.set_active_tab(Some(ActiveTab {
            id: 1,
            domain: "example.com".to_string(),
            url: "https://example.com/app".to_string(),
        }));

        Fixture {
            controller,
            host,
            clipboard,
            sink,
            prompt,
        }
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let mut fx = fixture();
        fx.controller.save_item("key", "value").await.unwrap();

        assert_eq!(
            fx.controller.snapshot().get("key").map(String::as_str),
            Some("value")
        );
        assert_eq!(
            fx.host.get(1, StorageMode::Local, "key").as_deref(),
            Some("value")
        );
    }

    #[tokio::test]
    async fn test_modes_are_independent() {
        let mut fx = fixture();
        fx.controller.save_item("k", "local").await.unwrap();

        fx.controller.switch_mode(StorageMode::Session).await.unwrap();
        assert!(fx.controller.snapshot().is_empty());

        fx.controller.save_item("k", "session").await.unwrap();
        fx.controller.switch_mode(StorageMode::Local).await.unwrap();
        assert_eq!(
            fx.controller.snapshot().get("k").map(String::as_str),
            Some("local")
        );
    }

    #[tokio::test]
    async fn test_no_active_tab() {
        let mut fx = fixture();
        fx.controller.set_active_tab(None);

        assert!(matches!(
            fx.controller.save_item("k", "v").await,
            Err(PopupError::NoActiveTab)
        ));

        fx.controller.reload().await.unwrap();
        assert!(fx.controller.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_import_scenario_with_overwrite() {
        let mut fx = fixture();
        fx.controller.save_item("a", "0").await.unwrap();

        let pending = fx
            .controller
            .begin_import(r#"{"version":"2.0","domain":"x","data":{"a":"1","b":"2"}}"#)
            .unwrap();
        let report = fx
            .controller
            .confirm_import(&pending, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(report, ImportReport { imported: 2, skipped: 0 });
        let snapshot = fx.controller.snapshot();
        assert_eq!(snapshot.get("a").map(String::as_str), Some("1"));
        assert_eq!(snapshot.get("b").map(String::as_str), Some("2"));
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn test_import_without_overwrite_skips_live_keys() {
        let mut fx = fixture();
        fx.controller.save_item("a", "0").await.unwrap();

        let pending = fx.controller.begin_import(r#"{"a":"1","b":"2"}"#).unwrap();
        let total = pending.len();
        let report = fx
            .controller
            .confirm_import(
                &pending,
                ImportOptions {
                    overwrite_existing: false,
                    backup_before_import: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(report.imported + report.skipped, total);
        assert_eq!(report.skipped, 1);
        let snapshot = fx.controller.snapshot();
        assert_eq!(snapshot.get("a").map(String::as_str), Some("0"));
        assert_eq!(snapshot.get("b").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_backup_before_import_writes_file_first() {
        let mut fx = fixture();
        fx.controller.save_item("old", "data").await.unwrap();

        let pending = fx.controller.begin_import(r#"{"new":"1"}"#).unwrap();
        fx.controller
            .confirm_import(
                &pending,
                ImportOptions {
                    overwrite_existing: true,
                    backup_before_import: true,
                },
            )
            .await
            .unwrap();

        let files = fx.sink.files();
        assert_eq!(files.len(), 1);
        assert!(files[0].0.starts_with("backup-"));
        assert!(files[0].1.contains("\"old\": \"data\""));
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let mut fx = fixture();
        fx.controller.save_item("a", "1").await.unwrap();
        fx.controller.save_item("b", "{\"n\":2}").await.unwrap();
        let original = fx.controller.snapshot().clone();

        fx.controller.export_all().unwrap();
        let exported = fx.sink.files()[0].1.clone();

        // Re-import onto an empty namespace
        fx.controller.clear_search();
        fx.host.wipe(1, StorageMode::Local);
        fx.controller.reload().await.unwrap();
        assert!(fx.controller.snapshot().is_empty());

        let pending = fx.controller.begin_import(&exported).unwrap();
        fx.controller
            .confirm_import(&pending, ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(fx.controller.snapshot(), &original);
    }

    #[tokio::test]
    async fn test_clear_all_needs_both_confirmations() {
        let mut fx = fixture();
        fx.controller.save_item("k", "v").await.unwrap();

        fx.prompt.script(&[true, false]);
        assert!(!fx.controller.clear_all().await.unwrap());
        assert_eq!(fx.controller.snapshot().len(), 1);

        fx.prompt.script(&[true, true]);
        assert!(fx.controller.clear_all().await.unwrap());
        assert!(fx.controller.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_delete_item_honors_confirm_setting() {
        let mut fx = fixture();
        fx.controller.save_item("k", "v").await.unwrap();

        // confirmDelete defaults on; a declined prompt is a no-op
        fx.prompt.script(&[false]);
        assert!(!fx.controller.delete_item("k").await.unwrap());
        assert_eq!(fx.controller.snapshot().len(), 1);

        // With the setting off, no prompt is consulted
        fx.controller.settings().set_confirm_delete(false).unwrap();
        assert!(fx.controller.delete_item("k").await.unwrap());
        assert!(fx.controller.snapshot().is_empty());
        assert_eq!(fx.prompt.asked(), 1);
    }

    #[tokio::test]
    async fn test_delete_selected_single_confirmation() {
        let mut fx = fixture();
        fx.controller.save_item("a", "1").await.unwrap();
        fx.controller.save_item("b", "2").await.unwrap();
        fx.controller.save_item("c", "3").await.unwrap();

        fx.prompt.script(&[true]);
        let deleted = fx
            .controller
            .delete_selected(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(fx.controller.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_copy_all_puts_envelope_on_clipboard() {
        let mut fx = fixture();
        fx.controller.save_item("k", "v").await.unwrap();
        fx.controller.copy_all().unwrap();

        let copied = fx.clipboard.texts();
        assert_eq!(copied.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&copied[0]).unwrap();
        assert_eq!(value["version"], "2.0");
        assert_eq!(value["storageMode"], "localStorage");
        assert_eq!(value["data"]["k"], "v");
    }

    #[tokio::test]
    async fn test_search_filter_and_stats() {
        let mut fx = fixture();
        fx.controller.save_item("userToken", "abc").await.unwrap();
        fx.controller.save_item("other", "xyz").await.unwrap();

        fx.controller.set_search_term("token");
        let filtered = fx.controller.filtered();
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("userToken"));

        let (count, _size) = fx.controller.stats();
        assert_eq!(count, 1);

        fx.controller.clear_search();
        assert_eq!(fx.controller.filtered().len(), 2);
    }
}
