//! Search history data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dictionary::DictionaryEntry;

/// A past lookup and the entry it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryItem {
    pub id: Uuid,
    /// The query as the user typed it
    pub query: String,
    pub entry: DictionaryEntry,
    pub searched_at: DateTime<Utc>,
}

impl SearchHistoryItem {
    pub fn new(query: String, entry: DictionaryEntry, searched_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            query,
            entry,
            searched_at,
        }
    }
}
