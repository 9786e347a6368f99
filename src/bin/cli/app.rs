use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use uuid::Uuid;

use aidict_lib::config::Config;
use aidict_lib::dictionary::DictionaryEntry;
use aidict_lib::flashcards::{Card, CardStore};
use aidict_lib::history::{HistoryStore, SearchHistoryItem};
use aidict_lib::settings::SettingsStore;
use aidict_lib::storage::FileStorage;

pub type DeckCard = Card<DictionaryEntry>;

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    pub config: Config,
    pub cards: CardStore<DictionaryEntry, Arc<FileStorage>>,
    pub history: HistoryStore<Arc<FileStorage>>,
    pub settings: SettingsStore<Arc<FileStorage>>,
}

impl App {
    /// Initialize from `--data-dir`, `AIDICT_DATA_DIR`, or the default data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir.or_else(|| std::env::var_os("AIDICT_DATA_DIR").map(PathBuf::from)) {
            Some(dir) => dir,
            None => FileStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let config = Config::load(&data_dir).context("Failed to load configuration")?;
        log::debug!("Using data directory {:?}", data_dir);

        let storage = Arc::new(FileStorage::new(data_dir.clone()));
        storage.init().context("Failed to initialize storage")?;

        let cards = CardStore::with_key(Arc::clone(&storage), config.storage.flashcards_key.clone());
        let history = HistoryStore::with_options(
            Arc::clone(&storage),
            config.storage.history_key.clone(),
            config.history.limit,
        );
        let settings = SettingsStore::new(storage);

        Ok(Self {
            data_dir,
            config,
            cards,
            history,
            settings,
        })
    }

    /// Find a card by id (unique prefix match) or by its headword
    pub fn find_card(&self, query: &str) -> Result<DeckCard> {
        if let Some(card) = self.cards.find_by_key(query) {
            return Ok(card);
        }
        if let Ok(id) = Uuid::parse_str(query) {
            return self.cards.get_card(id).with_context(|| format!("No card with id {}", id));
        }

        let cards = self.cards.list_cards();

        let query_lower = query.to_lowercase();
        let matches: Vec<&DeckCard> = cards
            .iter()
            .filter(|c| c.id.to_string().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No card matching '{}'", query),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous card id '{}'. Matches:\n{}", query,
                matches.iter().map(|c| format!("  - {} {}", c.id, c.item.simplified)).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Record a lookup in history, adding it to the deck when auto-add is on
    pub fn record_lookup(
        &self,
        query: &str,
        entry: DictionaryEntry,
    ) -> Result<(SearchHistoryItem, Option<DeckCard>)> {
        let now = Utc::now();
        let item = self.history
            .add(query, entry.clone(), now)
            .context("Failed to record history")?;

        let card = if self.settings.get().auto_add_to_flashcards {
            Some(self.cards.add_card(entry, now).context("Failed to add flashcard")?)
        } else {
            None
        };

        Ok((item, card))
    }
}
