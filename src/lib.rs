//! Spaced-repetition engine for vocabulary looked up in an AI dictionary.
//!
//! Cards are scheduled with an SM-2 variant ([`flashcards::algorithm`]) and
//! kept in a [`flashcards::CardStore`] that persists through any
//! [`storage::KeyValueStore`].

pub mod config;
pub mod dictionary;
pub mod flashcards;
pub mod history;
pub mod settings;
pub mod storage;

pub use dictionary::DictionaryEntry;
pub use flashcards::{Card, CardItem, CardStore, Grade};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
