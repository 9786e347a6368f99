//! User settings persisted alongside the deck
//!
//! Stored values are merged over the defaults, so settings written by an
//! older version (or only partially) still load.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::storage::{read_json, read_json_or_default, write_json, KeyValueStore, Result};

/// Default storage key for settings
pub const SETTINGS_KEY: &str = "aidict:settings";

/// Text-generation provider used for lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Anthropic,
    OpenAi,
    Gemini,
    DeepSeek,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
            Provider::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Provider::Anthropic),
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            "deepseek" => Ok(Provider::DeepSeek),
            _ => Err(format!("unknown provider: {}", s)),
        }
    }
}

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(format!("unknown theme: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub api_key: String,
    pub provider: Provider,
    pub theme: Theme,
    /// Add every looked-up word to the flashcard deck
    pub auto_add_to_flashcards: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            provider: Provider::default(),
            theme: Theme::default(),
            auto_add_to_flashcards: true,
        }
    }
}

/// Partial settings change; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub api_key: Option<String>,
    pub provider: Option<Provider>,
    pub theme: Option<Theme>,
    pub auto_add_to_flashcards: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none()
            && self.provider.is_none()
            && self.theme.is_none()
            && self.auto_add_to_flashcards.is_none()
    }
}

pub struct SettingsStore<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn get(&self) -> AppSettings {
        read_json_or_default(&self.store, SETTINGS_KEY)
    }

    /// Apply an update and persist the merged settings
    pub fn save(&self, update: SettingsUpdate) -> Result<AppSettings> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut settings: AppSettings = read_json(&self.store, SETTINGS_KEY)?;

        if let Some(api_key) = update.api_key {
            settings.api_key = api_key;
        }
        if let Some(provider) = update.provider {
            settings.provider = provider;
        }
        if let Some(theme) = update.theme {
            settings.theme = theme;
        }
        if let Some(auto_add) = update.auto_add_to_flashcards {
            settings.auto_add_to_flashcards = auto_add;
        }

        write_json(&self.store, SETTINGS_KEY, &settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    #[test]
    fn test_defaults_when_missing() {
        let settings = SettingsStore::new(MemoryStorage::new()).get();
        assert_eq!(settings, AppSettings::default());
        assert!(settings.auto_add_to_flashcards);
        assert_eq!(settings.provider, Provider::Anthropic);
        assert_eq!(settings.theme, Theme::System);
    }

    #[test]
    fn test_partial_stored_settings_merge_with_defaults() {
        let store = MemoryStorage::with_entry(SETTINGS_KEY, r#"{"theme": "dark"}"#);
        let settings = SettingsStore::new(store).get();

        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.auto_add_to_flashcards);
        assert_eq!(settings.provider, Provider::Anthropic);
    }

    #[test]
    fn test_save_applies_only_given_fields() {
        let settings = SettingsStore::new(MemoryStorage::new());

        settings
            .save(SettingsUpdate {
                provider: Some(Provider::DeepSeek),
                ..Default::default()
            })
            .unwrap();
        let saved = settings
            .save(SettingsUpdate {
                auto_add_to_flashcards: Some(false),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(saved.provider, Provider::DeepSeek);
        assert!(!saved.auto_add_to_flashcards);
        assert_eq!(settings.get(), saved);
    }

    #[test]
    fn test_save_fails_when_store_unreadable() {
        let store = Arc::new(MemoryStorage::with_entry(
            SETTINGS_KEY,
            r#"{"apiKey": "sk-test", "theme": "dark"}"#,
        ));
        let settings = SettingsStore::new(store.clone());

        store.set_fail_reads(true);
        let result = settings.save(SettingsUpdate {
            provider: Some(Provider::Gemini),
            ..Default::default()
        });
        assert!(result.is_err());

        store.set_fail_reads(false);
        let stored = settings.get();
        assert_eq!(stored.api_key, "sk-test");
        assert_eq!(stored.theme, Theme::Dark);
        assert_eq!(stored.provider, Provider::Anthropic);
    }

    #[test]
    fn test_concurrent_saves_keep_every_field() {
        let settings = Arc::new(SettingsStore::new(MemoryStorage::new()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let settings = Arc::clone(&settings);
                std::thread::spawn(move || {
                    let update = if i % 2 == 0 {
                        SettingsUpdate {
                            theme: Some(Theme::Light),
                            ..Default::default()
                        }
                    } else {
                        SettingsUpdate {
                            provider: Some(Provider::OpenAi),
                            ..Default::default()
                        }
                    };
                    settings.save(update).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = settings.get();
        assert_eq!(stored.theme, Theme::Light);
        assert_eq!(stored.provider, Provider::OpenAi);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("OpenAI".parse::<Provider>(), Ok(Provider::OpenAi));
        assert!("mistral".parse::<Provider>().is_err());
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));

        let json = serde_json::to_string(&Provider::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
    }
}
