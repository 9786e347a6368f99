//! Dictionary entry data models

use serde::{Deserialize, Serialize};

use crate::flashcards::CardItem;

/// An example sentence attached to an entry.
///
/// Chinese-learning entries carry `chinese`/`pinyin`, Japanese-learning
/// entries carry `japanese`/`reading`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSentence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,
    /// Hiragana reading of the Japanese sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    /// In the learner's native language
    pub translation: String,
}

/// A structured lexical entry returned by a dictionary lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub simplified: String,
    #[serde(default)]
    pub traditional: String,
    #[serde(default)]
    pub pinyin: String,
    #[serde(default)]
    pub part_of_speech: Vec<String>,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub example_sentences: Vec<ExampleSentence>,
    #[serde(default)]
    pub usage_note: String,
    /// HSK level 1-6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsk_level: Option<u8>,
    /// JLPT level 1-5 (N5 = 5, N1 = 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jlpt_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Romanization (romaji for Japanese)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanized: Option<String>,
    /// Japanese headword (kanji/kana)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
}

impl DictionaryEntry {
    pub fn new(simplified: impl Into<String>) -> Self {
        let simplified = simplified.into();
        Self {
            traditional: simplified.clone(),
            simplified,
            ..Self::default()
        }
    }

    pub fn with_pinyin(mut self, pinyin: impl Into<String>) -> Self {
        self.pinyin = pinyin.into();
        self
    }

    pub fn with_traditional(mut self, traditional: impl Into<String>) -> Self {
        self.traditional = traditional.into();
        self
    }

    pub fn with_definitions(mut self, definitions: Vec<String>) -> Self {
        self.definitions = definitions;
        self
    }

    /// Headword plus its reading, e.g. `学习 (xué xí)`
    pub fn headline(&self) -> String {
        let reading = if self.pinyin.is_empty() {
            self.reading.as_deref().unwrap_or_default()
        } else {
            self.pinyin.as_str()
        };

        if reading.is_empty() {
            self.simplified.clone()
        } else {
            format!("{} ({})", self.simplified, reading)
        }
    }
}

impl CardItem for DictionaryEntry {
    fn card_key(&self) -> &str {
        &self.simplified
    }
}
