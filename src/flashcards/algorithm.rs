//! SM-2 Spaced Repetition Algorithm
//!
//! Implementation of the SuperMemo 2 algorithm for calculating
//! review intervals based on recall quality.
//!
//! Grades map to SM-2 quality ratings (0-5):
//! - again: 0 (complete blackout)
//! - hard: 2 (incorrect, but the answer felt familiar)
//! - good: 4 (correct after hesitation)
//! - easy: 5 (perfect response)
//!
//! Every function here is pure. The current time is always passed in.

use chrono::{DateTime, Duration, Utc};

use super::models::{Card, CardStage, Grade, ReviewStats};

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval after the first successful review
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second consecutive successful review
const SECOND_INTERVAL: u32 = 6;

/// Interval and repetition count a review would produce, from the card's
/// state before the review.
fn next_interval(repetitions: u32, interval: u32, ease_factor: f64, grade: Grade) -> (u32, u32) {
    if !grade.is_success() {
        return (FIRST_INTERVAL, 0);
    }

    let interval = match repetitions {
        0 => FIRST_INTERVAL,
        1 => SECOND_INTERVAL,
        _ => {
            let grown = (f64::from(interval) * ease_factor).round();
            // Saturate rather than wrap on absurd stored values.
            if grown >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                (grown as u32).max(FIRST_INTERVAL)
            }
        }
    };

    (interval, repetitions.saturating_add(1))
}

/// Ease factor after a review with the given grade
///
/// EF' = max(1.3, EF + 0.1 - (5-q) * (0.08 + (5-q) * 0.02))
pub fn adjust_ease(ease_factor: f64, grade: Grade) -> f64 {
    let miss = f64::from(5 - grade.quality());
    let adjusted = ease_factor + 0.1 - miss * (0.08 + miss * 0.02);
    adjusted.max(MIN_EASE_FACTOR)
}

/// Apply a review to a card and return its new scheduling state.
///
/// The new interval and the new ease factor are both derived from the
/// card's state before this review. In particular the interval growth uses
/// the ease factor the card had going in, not the adjusted one.
pub fn review<T>(card: &Card<T>, grade: Grade, now: DateTime<Utc>) -> Card<T>
where
    T: Clone,
{
    let (interval, repetitions) =
        next_interval(card.repetitions, card.interval, card.ease_factor, grade);
    let ease_factor = adjust_ease(card.ease_factor, grade);

    Card {
        interval,
        repetitions,
        ease_factor,
        last_review: Some(now),
        due_date: due_after(now, interval),
        ..card.clone()
    }
}

fn due_after(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(interval))
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Cards that are due at `now`, in their original order
pub fn select_due<T>(cards: &[Card<T>], now: DateTime<Utc>) -> Vec<Card<T>>
where
    T: Clone,
{
    cards
        .iter()
        .filter(|card| card.is_due_at(now))
        .cloned()
        .collect()
}

/// Calculate the preview intervals for each grade.
/// Used to show users what interval each button would give.
///
/// Returns intervals for: Again, Hard, Good, Easy
pub fn preview_intervals<T>(card: &Card<T>) -> [u32; 4] {
    Grade::ALL.map(|grade| {
        next_interval(card.repetitions, card.interval, card.ease_factor, grade).0
    })
}

/// Summarize a deck by stage and due count
pub fn review_stats<T>(cards: &[Card<T>], now: DateTime<Utc>) -> ReviewStats {
    let mut stats = ReviewStats {
        total_cards: cards.len(),
        ..ReviewStats::default()
    };

    for card in cards {
        match card.stage() {
            CardStage::New => stats.new_cards += 1,
            CardStage::Learning => stats.learning_cards += 1,
            CardStage::Young => stats.young_cards += 1,
            CardStage::Mature => stats.mature_cards += 1,
        }

        if card.is_due_at(now) {
            stats.due_cards += 1;
        }
    }

    stats
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
