use chrono::{DateTime, Utc};

use aidict_lib::flashcards::algorithm::format_interval;
use aidict_lib::flashcards::{CardStage, Grade};

use crate::app::DeckCard;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn grade_color(grade: Grade) -> &'static str {
    match grade {
        Grade::Again => Color::RED,
        Grade::Hard => Color::YELLOW,
        Grade::Good => Color::GREEN,
        Grade::Easy => Color::BLUE,
    }
}

pub fn stage_label(stage: CardStage) -> &'static str {
    match stage {
        CardStage::New => "new",
        CardStage::Learning => "learning",
        CardStage::Young => "young",
        CardStage::Mature => "mature",
    }
}

/// "due now", or "in 3d" style relative label
pub fn due_label(card: &DeckCard, now: DateTime<Utc>) -> String {
    let remaining = card.time_until_due(now);
    if remaining.is_zero() {
        return "due now".to_string();
    }

    let days = remaining.num_days();
    if days == 0 {
        format!("in {}h", remaining.num_hours().max(1))
    } else {
        format!("in {}", format_interval(u32::try_from(days).unwrap_or(u32::MAX)))
    }
}

/// Render a card's front and back for the terminal
pub fn render_card(card: &DeckCard, use_color: bool) -> String {
    let entry = &card.item;
    let mut lines = Vec::new();

    lines.push(paint(&entry.headline(), Color::BOLD, use_color));
    if !entry.traditional.is_empty() && entry.traditional != entry.simplified {
        lines.push(paint(&format!("Traditional: {}", entry.traditional), Color::DIM, use_color));
    }
    if !entry.part_of_speech.is_empty() {
        lines.push(paint(&entry.part_of_speech.join(", "), Color::GRAY, use_color));
    }

    for (i, definition) in entry.definitions.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, definition));
    }

    for example in &entry.example_sentences {
        let sentence = example
            .chinese
            .as_deref()
            .or(example.japanese.as_deref())
            .unwrap_or_default();
        lines.push(format!("  > {}", sentence));
        lines.push(paint(&format!("    {}", example.translation), Color::DIM, use_color));
    }

    if !entry.usage_note.is_empty() {
        lines.push(paint(&format!("Note: {}", entry.usage_note), Color::CYAN, use_color));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aidict_lib::dictionary::DictionaryEntry;
    use aidict_lib::flashcards::Card;
    use chrono::Duration;

    #[test]
    fn test_paint_without_color() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_due_label() {
        let now = Utc::now();
        let mut card = Card::new(DictionaryEntry::new("学习"), now);
        assert_eq!(due_label(&card, now), "due now");

        card.due_date = now + Duration::days(14);
        assert_eq!(due_label(&card, now), "in 2w");

        card.due_date = now + Duration::hours(5);
        assert_eq!(due_label(&card, now), "in 5h");
    }

    #[test]
    fn test_render_card_plain() {
        let entry = DictionaryEntry::new("学习")
            .with_traditional("學習")
            .with_pinyin("xué xí")
            .with_definitions(vec!["to study".to_string()]);
        let card = Card::new(entry, Utc::now());

        let rendered = render_card(&card, false);
        assert_eq!(rendered, "学习 (xué xí)\nTraditional: 學習\n  1. to study");
    }
}
