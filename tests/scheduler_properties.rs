use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use aidict_lib::dictionary::DictionaryEntry;
use aidict_lib::flashcards::algorithm::{review, select_due, MIN_EASE_FACTOR};
use aidict_lib::flashcards::{Card, CardStore, Grade};
use aidict_lib::storage::MemoryStorage;

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn grade_strategy() -> impl Strategy<Value = Grade> {
    prop_oneof![
        Just(Grade::Again),
        Just(Grade::Hard),
        Just(Grade::Good),
        Just(Grade::Easy),
    ]
}

fn card_strategy() -> impl Strategy<Value = Card<String>> {
    (0u32..500, 130u32..400, 0u32..30, 0i64..100, 0i64..100).prop_map(
        |(interval, ease_hundredths, repetitions, added, due_offset)| {
            let added_at = base_time() + Duration::days(added);
            let mut card = Card::new(format!("word-{}", added), added_at);
            card.interval = interval;
            card.ease_factor = f64::from(ease_hundredths) / 100.0;
            card.repetitions = repetitions;
            card.due_date = added_at + Duration::days(due_offset);
            card
        },
    )
}

proptest! {
    #[test]
    fn ease_never_drops_below_floor(grades in prop::collection::vec(grade_strategy(), 1..12)) {
        let mut card = Card::new("学习".to_string(), base_time());
        let mut now = base_time();

        for grade in grades {
            card = review(&card, grade, now);
            prop_assert!(card.ease_factor >= MIN_EASE_FACTOR);
            prop_assert!(card.interval >= 1);
            prop_assert_eq!(card.last_review, Some(now));
            prop_assert_eq!(card.due_date, now + Duration::days(i64::from(card.interval)));
            now = card.due_date;
        }
    }

    #[test]
    fn lapse_always_resets(card in card_strategy(), lapse in prop_oneof![Just(Grade::Again), Just(Grade::Hard)]) {
        let reviewed = review(&card, lapse, base_time());
        prop_assert_eq!(reviewed.repetitions, 0);
        prop_assert_eq!(reviewed.interval, 1);
    }

    #[test]
    fn success_counts_consecutive_reviews(grades in prop::collection::vec(grade_strategy(), 1..30)) {
        let mut card = Card::new("学习".to_string(), base_time());
        let mut streak = 0u32;

        for grade in grades {
            let before = card.clone();
            card = review(&card, grade, base_time());
            streak = if grade.is_success() { streak + 1 } else { 0 };
            prop_assert_eq!(card.repetitions, streak);

            if grade.is_success() && before.repetitions >= 2 {
                let expected = (f64::from(before.interval) * before.ease_factor).round() as u32;
                prop_assert_eq!(card.interval, expected.max(1));
            }
        }
    }

    #[test]
    fn select_due_is_exact_stable_and_idempotent(
        cards in prop::collection::vec(card_strategy(), 0..40),
        now_offset in 0i64..200,
    ) {
        let now = base_time() + Duration::days(now_offset);
        let due = select_due(&cards, now);

        let expected: Vec<Card<String>> = cards
            .iter()
            .filter(|c| c.due_date <= now)
            .cloned()
            .collect();
        prop_assert_eq!(&due, &expected);
        prop_assert_eq!(select_due(&due, now), due);
    }

    #[test]
    fn deck_round_trips_through_json(cards in prop::collection::vec(card_strategy(), 0..20), reviews in prop::collection::vec(grade_strategy(), 0..5)) {
        let cards: Vec<Card<String>> = cards
            .into_iter()
            .map(|card| {
                reviews
                    .iter()
                    .fold(card, |c, grade| review(&c, *grade, base_time()))
            })
            .collect();

        let json = serde_json::to_string(&cards).unwrap();
        let back: Vec<Card<String>> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, cards);
    }

    #[test]
    fn add_is_deduplicated_by_headword(words in prop::collection::vec("[a-e]{1,2}", 1..30)) {
        let store: CardStore<DictionaryEntry, _> = CardStore::new(MemoryStorage::new());
        let mut distinct = std::collections::BTreeSet::new();

        for word in &words {
            let card = store.add_card(DictionaryEntry::new(word.as_str()), base_time()).unwrap();
            let again = store.add_card(DictionaryEntry::new(word.as_str()), base_time()).unwrap();
            prop_assert_eq!(card.id, again.id);
            distinct.insert(word.clone());
        }

        prop_assert_eq!(store.list_cards().len(), distinct.len());
    }
}

#[test]
fn unreviewed_card_round_trip_omits_last_review() {
    let card = Card::new(DictionaryEntry::new("学习"), base_time());
    let json = serde_json::to_value(&card).unwrap();
    assert!(json.get("lastReview").is_none());

    let back: Card<DictionaryEntry> = serde_json::from_value(json).unwrap();
    assert_eq!(back, card);
    assert!(back.last_review.is_none());
}
