//! Data models for the flashcard system

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Initial ease factor for a new card
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Payload a card can be bound to.
///
/// The natural key decides deduplication when adding cards: two items with
/// the same key are the same thing to study.
pub trait CardItem {
    fn card_key(&self) -> &str;
}

/// A scheduling record bound to one learned item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card<T> {
    pub id: Uuid,
    pub item: T,
    pub added_at: DateTime<Utc>,
    /// When the card is due for review
    pub due_date: DateTime<Utc>,
    /// Current interval in days
    #[serde(default)]
    pub interval: u32,
    /// SM-2 ease factor (default 2.5, never below 1.3)
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Consecutive successful reviews since the last lapse
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl<T> Card<T> {
    pub fn new(item: T, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item,
            added_at: now,
            due_date: now,
            interval: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            repetitions: 0,
            last_review: None,
        }
    }

    /// Check if the card is due for review at `now`
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now
    }

    /// How long until the card becomes due; zero if it already is
    pub fn time_until_due(&self, now: DateTime<Utc>) -> Duration {
        if self.is_due_at(now) {
            Duration::zero()
        } else {
            self.due_date - now
        }
    }

    pub fn stage(&self) -> CardStage {
        CardStage::of(self.repetitions, self.interval, self.last_review.is_some())
    }
}

/// Recall outcome reported by the learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Forgot the item
    Again,
    /// Recalled with serious difficulty
    Hard,
    /// Recalled after hesitation
    Good,
    /// Perfect recall
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// SM-2 quality score (0-5) for this grade
    pub fn quality(self) -> u8 {
        match self {
            Grade::Again => 0,
            Grade::Hard => 2,
            Grade::Good => 4,
            Grade::Easy => 5,
        }
    }

    /// Inverse of [`Grade::quality`]. Only the four mapped scores are accepted.
    pub fn from_quality(quality: u8) -> Result<Self, GradeError> {
        Grade::ALL
            .into_iter()
            .find(|g| g.quality() == quality)
            .ok_or(GradeError::InvalidQuality(quality))
    }

    /// Whether this grade counts as remembering the item
    pub fn is_success(self) -> bool {
        self.quality() >= 3
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            other => match other.parse::<u8>() {
                Ok(q) => Grade::from_quality(q),
                Err(_) => Err(GradeError::InvalidName(s.to_string())),
            },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradeError {
    #[error("Invalid grade {0:?} (expected again, hard, good or easy)")]
    InvalidName(String),

    #[error("Invalid quality {0} (expected 0, 2, 4 or 5)")]
    InvalidQuality(u8),
}

/// Where a card sits in the learning progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStage {
    /// Never reviewed
    New,
    /// First success, or recovering from a lapse
    Learning,
    /// Second consecutive success
    Young,
    /// Three or more consecutive successes
    Mature,
}

impl CardStage {
    fn of(repetitions: u32, interval: u32, reviewed: bool) -> Self {
        match repetitions {
            0 if !reviewed && interval == 0 => CardStage::New,
            0 | 1 => CardStage::Learning,
            2 => CardStage::Young,
            _ => CardStage::Mature,
        }
    }
}

/// Statistics for a deck at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub young_cards: usize,
    pub mature_cards: usize,
    pub due_cards: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_quality_mapping() {
        assert_eq!(Grade::Again.quality(), 0);
        assert_eq!(Grade::Hard.quality(), 2);
        assert_eq!(Grade::Good.quality(), 4);
        assert_eq!(Grade::Easy.quality(), 5);

        assert!(!Grade::Again.is_success());
        assert!(!Grade::Hard.is_success());
        assert!(Grade::Good.is_success());
        assert!(Grade::Easy.is_success());
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!("good".parse::<Grade>().unwrap(), Grade::Good);
        assert_eq!(" EASY ".parse::<Grade>().unwrap(), Grade::Easy);
        assert_eq!("0".parse::<Grade>().unwrap(), Grade::Again);
        assert_eq!("2".parse::<Grade>().unwrap(), Grade::Hard);

        assert_eq!(
            "perfect".parse::<Grade>(),
            Err(GradeError::InvalidName("perfect".to_string()))
        );
        assert_eq!("3".parse::<Grade>(), Err(GradeError::InvalidQuality(3)));
        assert_eq!(Grade::from_quality(6), Err(GradeError::InvalidQuality(6)));
    }

    #[test]
    fn test_new_card_defaults() {
        let now = Utc::now();
        let card = Card::new("word".to_string(), now);

        assert_eq!(card.interval, 0);
        assert_eq!(card.ease_factor, 2.5);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.added_at, now);
        assert_eq!(card.due_date, now);
        assert!(card.last_review.is_none());
        assert!(card.is_due_at(now));
        assert_eq!(card.stage(), CardStage::New);
    }

    #[test]
    fn test_time_until_due() {
        let now = Utc::now();
        let mut card = Card::new("word".to_string(), now);
        assert_eq!(card.time_until_due(now), Duration::zero());

        card.due_date = now + Duration::days(3);
        assert_eq!(card.time_until_due(now), Duration::days(3));
        assert!(!card.is_due_at(now));
    }

    #[test]
    fn test_serialized_layout() {
        let now = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let card = Card::new("word".to_string(), now);
        let json = serde_json::to_value(&card).unwrap();

        assert_eq!(json["item"], "word");
        let added_at: DateTime<Utc> = json["addedAt"].as_str().unwrap().parse().unwrap();
        let due_date: DateTime<Utc> = json["dueDate"].as_str().unwrap().parse().unwrap();
        assert_eq!(added_at, now);
        assert_eq!(due_date, now);
        assert_eq!(json["interval"], 0);
        assert_eq!(json["easeFactor"], 2.5);
        assert_eq!(json["repetitions"], 0);
        assert!(json.get("lastReview").is_none());
    }
}
