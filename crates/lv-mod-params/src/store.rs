//! Durable per-file cache of committed parameter overrides.
//!
//! The whole override set lives under one storage key as
//! `[[filePath, [[name, value], ...]], ...]`. It is read once at startup and
//! rewritten after every commit. Storage failures never reach the user: a
//! failed load leaves the store empty, a failed save is logged and dropped.

use indexmap::IndexMap;

use lv_base::config::constants::PARAMETER_CACHE_KEY;
use lv_base::error::CacheError;
use lv_base::storage::Storage;
use lv_base::types::OverrideEntry;

type SerializedOverrides = Vec<(String, Vec<OverrideEntry>)>;

pub struct ParameterStore {
    storage: Box<dyn Storage>,
    entries: IndexMap<String, Vec<OverrideEntry>>,
    loaded: bool,
}

impl ParameterStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage, entries: IndexMap::new(), loaded: false }
    }

    /// Read the persisted override set. Only the first call touches storage.
    pub fn load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        match self.read_entries() {
            Ok(Some(entries)) => {
                tracing::info!(files = entries.len(), "loaded parameter overrides");
                self.entries = entries;
            }
            Ok(None) => tracing::debug!("no parameter override cache yet"),
            Err(e) => tracing::warn!(error = %e, "parameter override cache unavailable, starting empty"),
        }
    }

    fn read_entries(&self) -> Result<Option<IndexMap<String, Vec<OverrideEntry>>>, CacheError> {
        let Some(text) = self.storage.read(PARAMETER_CACHE_KEY)? else {
            return Ok(None);
        };
        let pairs: SerializedOverrides = serde_json::from_str(&text)?;
        Ok(Some(pairs.into_iter().collect()))
    }

    /// Overrides last committed for `file_path`; empty when none.
    pub fn get(&self, file_path: &str) -> &[OverrideEntry] {
        self.entries.get(file_path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Replace the entry for `file_path` with `diff` and persist.
    ///
    /// This overwrites rather than merges: an override that is absent from
    /// `diff` (because the user set it back to its default) is forgotten.
    pub fn set(&mut self, file_path: &str, diff: Vec<OverrideEntry>) {
        tracing::debug!(file = file_path, overrides = diff.len(), "committing parameter overrides");
        self.entries.insert(file_path.to_string(), diff);
        self.save();
    }

    /// Write the full override set back to storage.
    pub fn save(&mut self) {
        if let Err(e) = self.write_entries() {
            tracing::warn!(error = %e, "failed to persist parameter overrides");
        }
    }

    fn write_entries(&mut self) -> Result<(), CacheError> {
        let pairs: Vec<(&String, &Vec<OverrideEntry>)> = self.entries.iter().collect();
        let text = serde_json::to_string(&pairs)?;
        self.storage.write(PARAMETER_CACHE_KEY, &text)
    }

    /// Number of files with a cached entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
