use std::io::Read;

use anyhow::{Context, Result};

use aidict_lib::dictionary::DictionaryEntry;

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let items = app.history.list();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No lookups yet.");
                return Ok(());
            }

            for item in &items {
                let gloss = item.entry.definitions.first().map(String::as_str).unwrap_or("");
                println!("{}  {:<12} {}  {}",
                    item.searched_at.format("%Y-%m-%d %H:%M"),
                    item.query,
                    item.entry.headline(),
                    gloss);
            }
        }
    }

    Ok(())
}

/// Read the entry JSON from a file path, or stdin for "-"
fn read_entry(source: &str) -> Result<DictionaryEntry> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))?
    };

    serde_json::from_str(&content).context("Entry is not a valid dictionary entry")
}

pub fn run_record(app: &App, query: &str, source: &str, format: &OutputFormat) -> Result<()> {
    let entry = read_entry(source)?;
    let (item, card) = app.record_lookup(query, entry)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "historyId": item.id.to_string(),
                "cardId": card.as_ref().map(|c| c.id.to_string()),
            }));
        }
        OutputFormat::Plain => {
            println!("Recorded lookup '{}' -> {}", item.query, item.entry.headline());
            if let Some(card) = card {
                println!("  Flashcard: {}", card.id);
            }
        }
    }

    Ok(())
}

pub fn run_clear(app: &App) -> Result<()> {
    app.history.clear().context("Failed to clear history")?;
    println!("History cleared.");
    Ok(())
}
