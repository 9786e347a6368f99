use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use aidict_lib::dictionary::DictionaryEntry;

use crate::app::{App, DeckCard};
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn card_json(card: &DeckCard) -> serde_json::Value {
    serde_json::json!({
        "id": card.id.to_string(),
        "word": card.item.simplified,
        "pinyin": card.item.pinyin,
        "stage": terminal::stage_label(card.stage()),
        "interval": card.interval,
        "easeFactor": card.ease_factor,
        "repetitions": card.repetitions,
        "dueDate": card.due_date.to_rfc3339(),
        "lastReview": card.last_review.map(|t| t.to_rfc3339()),
    })
}

pub fn run_add(
    app: &App,
    word: String,
    pinyin: Option<String>,
    traditional: Option<String>,
    definitions: Vec<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mut entry = DictionaryEntry::new(word).with_definitions(definitions);
    if let Some(pinyin) = pinyin {
        entry = entry.with_pinyin(pinyin);
    }
    if let Some(traditional) = traditional {
        entry = entry.with_traditional(traditional);
    }

    let (card, created) = app.cards.add_or_get(entry, Utc::now()).context("Failed to add card")?;

    match format {
        OutputFormat::Json => {
            let mut output = card_json(&card);
            output["created"] = serde_json::Value::Bool(created);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if created {
                println!("Added: {}", terminal::paint(&card.item.headline(), Color::BOLD, use_color));
            } else {
                println!("Already in deck: {}", card.item.headline());
            }
            println!("  ID: {}", card.id);
        }
    }

    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.cards.list_cards();
    let now = Utc::now();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = cards.iter().map(card_json).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards yet. Add one with `aidict-cli add <word>`.");
                return Ok(());
            }

            let word_width = cards.iter().map(|c| c.item.simplified.chars().count()).max().unwrap_or(4).clamp(4, 20);

            println!("{:<8} {:<ww$} {:<9} {}", "ID", "Word", "Stage", "Due", ww = word_width);
            println!("{} {} {} {}",
                "\u{2500}".repeat(8),
                "\u{2500}".repeat(word_width),
                "\u{2500}".repeat(9),
                "\u{2500}".repeat(10));

            for card in &cards {
                let id = card.id.to_string();
                let due = terminal::due_label(card, now);
                let due = if card.is_due_at(now) {
                    terminal::paint(&due, Color::GREEN, use_color)
                } else {
                    terminal::paint(&due, Color::DIM, use_color)
                };
                println!("{:<8} {:<ww$} {:<9} {}",
                    &id[..8],
                    card.item.simplified,
                    terminal::stage_label(card.stage()),
                    due,
                    ww = word_width);
            }

            println!("\n{} cards", cards.len());
        }
    }

    Ok(())
}

pub fn run_show(app: &App, query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let card = app.find_card(query)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::render_card(&card, use_color));
            println!();
            println!("  ID:          {}", card.id);
            println!("  Stage:       {}", terminal::stage_label(card.stage()));
            println!("  Interval:    {}d", card.interval);
            println!("  Ease:        {:.2}", card.ease_factor);
            println!("  Repetitions: {}", card.repetitions);
            println!("  Added:       {}", card.added_at.format("%Y-%m-%d %H:%M"));
            println!("  Due:         {} ({})", card.due_date.format("%Y-%m-%d %H:%M"), terminal::due_label(&card, Utc::now()));
            if let Some(last) = card.last_review {
                println!("  Reviewed:    {}", last.format("%Y-%m-%d %H:%M"));
            }
        }
    }

    Ok(())
}

pub fn run_remove(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(query)?;
    app.cards.remove_card(card.id).context("Failed to remove card")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "removed": card.id.to_string() }));
        }
        OutputFormat::Plain => {
            println!("Removed: {} ({})", card.item.simplified, card.id);
        }
    }

    Ok(())
}

pub fn run_import(app: &App, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let remote: Vec<DeckCard> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a card array", path.display()))?;

    let summary = app.cards.merge_remote(remote).context("Failed to merge cards")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "added": summary.added,
                "updated": summary.updated,
                "unchanged": summary.unchanged,
            }));
        }
        OutputFormat::Plain => {
            println!("Imported {}: {} added, {} updated, {} unchanged",
                path.display(), summary.added, summary.updated, summary.unchanged);
        }
    }

    Ok(())
}
