use anyhow::{bail, Context, Result};

use aidict_lib::settings::{AppSettings, Provider, SettingsUpdate, Theme};

use crate::app::App;
use crate::OutputFormat;

fn print_settings(app: &App, settings: &AppSettings, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            // Never echo the key itself
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "provider": settings.provider,
                "theme": settings.theme,
                "autoAddToFlashcards": settings.auto_add_to_flashcards,
                "apiKeySet": !settings.api_key.is_empty(),
                "dataDir": app.data_dir.to_string_lossy(),
            }))?);
        }
        OutputFormat::Plain => {
            println!("Provider:   {}", settings.provider);
            println!("Theme:      {}", settings.theme);
            println!("Auto-add:   {}", settings.auto_add_to_flashcards);
            println!("API key:    {}", if settings.api_key.is_empty() { "(not set)" } else { "(set)" });
            println!("Data dir:   {}", app.data_dir.display());
        }
    }
    Ok(())
}

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    print_settings(app, &app.settings.get(), format)
}

pub fn run_set(
    app: &App,
    provider: Option<Provider>,
    theme: Option<Theme>,
    auto_add: Option<bool>,
    api_key: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let update = SettingsUpdate {
        api_key,
        provider,
        theme,
        auto_add_to_flashcards: auto_add,
    };
    if update.is_empty() {
        bail!("Nothing to change. Pass --provider, --theme, --auto-add or --api-key.");
    }

    let settings = app.settings.save(update).context("Failed to save settings")?;
    print_settings(app, &settings, format)
}
