//! Flashcard and spaced repetition system
//!
//! This module provides:
//! - Cards bound to any payload with a natural key
//! - SM-2 spaced repetition algorithm
//! - Due-set selection and deck statistics
//! - A deck store persisted through a key-value store

pub mod algorithm;
pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{CardStore, FlashcardStorageError, MergeSummary, FLASHCARDS_KEY};
