//! Card collection persisted through a key-value store
//!
//! The whole deck is one JSON array under a single key, newest card first.
//! Every mutation rewrites the full array before returning.

use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::{review, review_stats, select_due, MIN_EASE_FACTOR};
use super::models::{Card, CardItem, Grade, ReviewStats};
use crate::storage::{read_json, read_json_or_default, write_json, KeyValueStore, StorageError};

/// Default storage key for the deck
pub const FLASHCARDS_KEY: &str = "aidict:flashcards";

#[derive(Error, Debug)]
pub enum FlashcardStorageError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, FlashcardStorageError>;

/// Outcome of merging cards from another device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// The flashcard deck, persisted as one JSON array
pub struct CardStore<T, S> {
    store: S,
    key: String,
    /// Serializes each read-modify-write cycle
    write_lock: Mutex<()>,
    _item: PhantomData<fn() -> T>,
}

impl<T, S> CardStore<T, S>
where
    T: CardItem + Clone + Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self::with_key(store, FLASHCARDS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
            _item: PhantomData,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data of its own, so a poisoned lock is safe to reuse.
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load(&self) -> Vec<Card<T>> {
        read_json_or_default(&self.store, &self.key)
    }

    /// Load the deck ahead of a rewrite; a failing store aborts the mutation
    fn load_for_update(&self) -> Result<Vec<Card<T>>> {
        Ok(read_json(&self.store, &self.key)?)
    }

    fn save(&self, cards: &[Card<T>]) -> Result<()> {
        write_json(&self.store, &self.key, cards)?;
        Ok(())
    }

    // ==================== Card Operations ====================

    /// List all cards, most recently added first
    pub fn list_cards(&self) -> Vec<Card<T>> {
        self.load()
    }

    /// Get a specific card
    pub fn get_card(&self, card_id: Uuid) -> Option<Card<T>> {
        self.load().into_iter().find(|c| c.id == card_id)
    }

    /// Find the card bound to an item key
    pub fn find_by_key(&self, key: &str) -> Option<Card<T>> {
        self.load().into_iter().find(|c| c.item.card_key() == key)
    }

    /// Add a card for `item`, or return the existing card for the same key
    pub fn add_card(&self, item: T, now: DateTime<Utc>) -> Result<Card<T>> {
        self.add_or_get(item, now).map(|(card, _)| card)
    }

    /// Same as [`add_card`](Self::add_card), also reporting whether the card
    /// was created by this call.
    pub fn add_or_get(&self, item: T, now: DateTime<Utc>) -> Result<(Card<T>, bool)> {
        let _guard = self.lock();
        let mut cards = self.load_for_update()?;

        if let Some(existing) = cards
            .iter()
            .find(|c| c.item.card_key() == item.card_key())
        {
            log::debug!("Card for {:?} already exists: {}", item.card_key(), existing.id);
            return Ok((existing.clone(), false));
        }

        let card = Card::new(item, now);
        cards.insert(0, card.clone());
        self.save(&cards)?;

        log::info!("Added card {} for {:?}", card.id, card.item.card_key());
        Ok((card, true))
    }

    /// Delete a card. Unknown ids are ignored.
    pub fn remove_card(&self, card_id: Uuid) -> Result<()> {
        let _guard = self.lock();
        let mut cards = self.load_for_update()?;

        let before = cards.len();
        cards.retain(|c| c.id != card_id);
        if cards.len() == before {
            log::debug!("Card {} not present, nothing to remove", card_id);
        } else {
            log::info!("Removed card {}", card_id);
        }

        self.save(&cards)
    }

    // ==================== Review Operations ====================

    /// Get all cards due at `now`, in deck order, optionally capped
    pub fn select_due_cards(&self, now: DateTime<Utc>, limit: Option<usize>) -> Vec<Card<T>> {
        let mut due = select_due(&self.load(), now);
        if let Some(limit) = limit {
            due.truncate(limit);
        }
        log::debug!("{} cards due at {}", due.len(), now);
        due
    }

    /// Submit a review for a card and persist the result
    pub fn review_card(&self, card_id: Uuid, grade: Grade, now: DateTime<Utc>) -> Result<Card<T>> {
        let _guard = self.lock();
        let mut cards = self.load_for_update()?;

        let pos = cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(FlashcardStorageError::CardNotFound(card_id))?;

        let updated = review(&cards[pos], grade, now);
        cards[pos] = updated.clone();
        self.save(&cards)?;

        log::info!(
            "Reviewed card {} as {}: interval={}d ease={:.2} reps={}",
            card_id,
            grade,
            updated.interval,
            updated.ease_factor,
            updated.repetitions
        );
        Ok(updated)
    }

    /// Get review statistics for the deck
    pub fn review_stats(&self, now: DateTime<Utc>) -> ReviewStats {
        review_stats(&self.load(), now)
    }

    // ==================== Sync Operations ====================

    /// Merge cards from another copy of the deck, last write wins per id.
    ///
    /// A card reviewed more recently replaces the local copy; a never-reviewed
    /// copy never replaces a reviewed one and ties keep the local card.
    /// Unknown ids are added at the front. A remote card whose item key
    /// belongs to a different card is skipped, and remote ease factors below
    /// the floor are raised to it.
    pub fn merge_remote(&self, remote: Vec<Card<T>>) -> Result<MergeSummary> {
        let _guard = self.lock();
        let mut cards = self.load_for_update()?;
        let mut summary = MergeSummary::default();
        let mut incoming: Vec<Card<T>> = Vec::new();

        for mut card in remote {
            let local = cards.iter().position(|c| c.id == card.id);
            let key_taken = cards
                .iter()
                .chain(incoming.iter())
                .any(|c| c.id != card.id && c.item.card_key() == card.item.card_key());
            if key_taken {
                log::warn!(
                    "Skipping remote card {}: {:?} belongs to another card",
                    card.id,
                    card.item.card_key()
                );
                summary.unchanged += 1;
                continue;
            }

            if card.ease_factor < MIN_EASE_FACTOR || card.ease_factor.is_nan() {
                log::warn!(
                    "Remote card {} has ease {}, raising to {}",
                    card.id,
                    card.ease_factor,
                    MIN_EASE_FACTOR
                );
                card.ease_factor = MIN_EASE_FACTOR;
            }

            match local {
                Some(pos) => {
                    if card.last_review > cards[pos].last_review {
                        cards[pos] = card;
                        summary.updated += 1;
                    } else {
                        summary.unchanged += 1;
                    }
                }
                None if incoming.iter().any(|c| c.id == card.id) => {
                    summary.unchanged += 1;
                }
                None => {
                    incoming.push(card);
                    summary.added += 1;
                }
            }
        }

        if summary.added > 0 || summary.updated > 0 {
            incoming.append(&mut cards);
            self.save(&incoming)?;
        }

        log::info!(
            "Merged remote deck: {} added, {} updated, {} unchanged",
            summary.added,
            summary.updated,
            summary.unchanged
        );
        Ok(summary)
    }
}
