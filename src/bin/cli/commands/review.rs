use anyhow::{Context, Result};
use chrono::Utc;

use aidict_lib::flashcards::algorithm::{format_interval, preview_intervals};
use aidict_lib::flashcards::Grade;

use crate::app::App;
use crate::commands::cards::card_json;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run_due(app: &App, limit: Option<usize>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let limit = limit.or(app.config.review.session_limit);
    let due = app.cards.select_due_cards(Utc::now(), limit);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = due.iter().map(card_json).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due. Come back later!");
                return Ok(());
            }

            for card in &due {
                let id = card.id.to_string();
                println!("{}  {}  {}",
                    terminal::paint(&id[..8], Color::GRAY, use_color),
                    terminal::paint(&card.item.headline(), Color::BOLD, use_color),
                    terminal::stage_label(card.stage()));
            }
            println!("\n{} due", due.len());
        }
    }

    Ok(())
}

pub fn run_review(app: &App, query: &str, grade: Grade, format: &OutputFormat, use_color: bool) -> Result<()> {
    let card = app.find_card(query)?;
    let updated = app.cards
        .review_card(card.id, grade, Utc::now())
        .context("Failed to save review")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card_json(&updated))?);
        }
        OutputFormat::Plain => {
            println!("{} {} -> next review in {} (ease {:.2})",
                terminal::paint(grade.as_str(), terminal::grade_color(grade), use_color),
                updated.item.simplified,
                format_interval(updated.interval),
                updated.ease_factor);
        }
    }

    Ok(())
}

pub fn run_preview(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(query)?;
    let intervals = preview_intervals(&card);

    match format {
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = Grade::ALL
                .iter()
                .zip(intervals)
                .map(|(grade, days)| (grade.as_str().to_string(), serde_json::Value::from(days)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let labels: Vec<String> = Grade::ALL
                .iter()
                .zip(intervals)
                .map(|(grade, days)| format!("{}: {}", grade, format_interval(days)))
                .collect();
            println!("{}  {}", card.item.simplified, labels.join("  "));
        }
    }

    Ok(())
}

pub fn run_stats(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.cards.review_stats(Utc::now());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Cards:    {}", stats.total_cards);
            println!("  New:      {}", stats.new_cards);
            println!("  Learning: {}", stats.learning_cards);
            println!("  Young:    {}", stats.young_cards);
            println!("  Mature:   {}", stats.mature_cards);
            println!("Due now:  {}", stats.due_cards);
        }
    }

    Ok(())
}
