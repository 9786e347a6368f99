//! Search history storage implementation

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::models::SearchHistoryItem;
use crate::dictionary::DictionaryEntry;
use crate::storage::{read_json, read_json_or_default, write_json, KeyValueStore, Result};

/// Default storage key for the history list
pub const HISTORY_KEY: &str = "aidict:history";

/// Default number of lookups kept
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Storage for recent lookups, newest first
pub struct HistoryStore<S> {
    store: S,
    key: String,
    limit: usize,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, HISTORY_KEY, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_options(store: S, key: impl Into<String>, limit: usize) -> Self {
        Self {
            store,
            key: key.into(),
            limit,
            write_lock: Mutex::new(()),
        }
    }

    /// List all history items, newest first
    pub fn list(&self) -> Vec<SearchHistoryItem> {
        read_json_or_default(&self.store, &self.key)
    }

    /// Record a lookup.
    ///
    /// A previous item with the same query is dropped so the query moves to
    /// the top. The list is trimmed to the configured limit.
    pub fn add(
        &self,
        query: &str,
        entry: DictionaryEntry,
        now: DateTime<Utc>,
    ) -> Result<SearchHistoryItem> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut items: Vec<SearchHistoryItem> = read_json(&self.store, &self.key)?;
        items.retain(|i| i.query != query);

        let item = SearchHistoryItem::new(query.to_string(), entry, now);
        items.insert(0, item.clone());
        items.truncate(self.limit);

        write_json(&self.store, &self.key, &items)?;
        Ok(item)
    }

    /// Delete all history
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.store.remove(&self.key)?;
        log::info!("Cleared search history");
        Ok(())
    }
}
