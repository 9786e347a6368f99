mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use aidict_lib::flashcards::Grade;
use aidict_lib::settings::{Provider, Theme};

#[derive(Parser)]
#[command(name = "aidict-cli", about = "Spaced-repetition vocabulary trainer", version)]
struct Cli {
    /// Data directory (default: $AIDICT_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add a word to the flashcard deck
    Add {
        /// Simplified headword
        word: String,
        #[arg(long)]
        pinyin: Option<String>,
        #[arg(long)]
        traditional: Option<String>,
        /// Definition (repeatable)
        #[arg(long = "definition")]
        definitions: Vec<String>,
    },

    /// List all cards, newest first
    List,

    /// Show one card
    Show {
        /// Card id (unique prefix) or headword
        card: String,
    },

    /// Remove a card from the deck
    Remove {
        /// Card id (unique prefix) or headword
        card: String,
    },

    /// List cards due for review now
    Due {
        /// Maximum cards (overrides review.session_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Grade a card: again, hard, good or easy
    Review {
        /// Card id (unique prefix) or headword
        card: String,
        grade: Grade,
    },

    /// Show the interval each grade would give
    Preview {
        /// Card id (unique prefix) or headword
        card: String,
    },

    /// Deck statistics
    Stats,

    /// Merge cards from an exported deck (JSON array), newest review wins
    Import {
        /// Path to the JSON file
        path: PathBuf,
    },

    /// Search history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List recent lookups
    List,

    /// Record a lookup result (JSON dictionary entry, "-" for stdin)
    Record {
        /// The query as typed
        query: String,
        /// Path to the entry JSON, or "-" to read stdin
        entry: String,
    },

    /// Delete all history
    Clear,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current settings
    Show,

    /// Change settings
    Set {
        #[arg(long)]
        provider: Option<Provider>,
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        auto_add: Option<bool>,
        #[arg(long)]
        api_key: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Add { word, pinyin, traditional, definitions } => {
            commands::cards::run_add(&app, word, pinyin, traditional, definitions, &cli.format, use_color)?;
        }
        Command::List => {
            commands::cards::run_list(&app, &cli.format, use_color)?;
        }
        Command::Show { card } => {
            commands::cards::run_show(&app, &card, &cli.format, use_color)?;
        }
        Command::Remove { card } => {
            commands::cards::run_remove(&app, &card, &cli.format)?;
        }
        Command::Import { path } => {
            commands::cards::run_import(&app, &path, &cli.format)?;
        }
        Command::Due { limit } => {
            commands::review::run_due(&app, limit, &cli.format, use_color)?;
        }
        Command::Review { card, grade } => {
            commands::review::run_review(&app, &card, grade, &cli.format, use_color)?;
        }
        Command::Preview { card } => {
            commands::review::run_preview(&app, &card, &cli.format)?;
        }
        Command::Stats => {
            commands::review::run_stats(&app, &cli.format)?;
        }
        Command::History(subcmd) => match subcmd {
            HistoryCommand::List => commands::history::run_list(&app, &cli.format)?,
            HistoryCommand::Record { query, entry } => {
                commands::history::run_record(&app, &query, &entry, &cli.format)?;
            }
            HistoryCommand::Clear => commands::history::run_clear(&app)?,
        },
        Command::Settings(subcmd) => match subcmd {
            SettingsCommand::Show => commands::settings::run_show(&app, &cli.format)?,
            SettingsCommand::Set { provider, theme, auto_add, api_key } => {
                commands::settings::run_set(&app, provider, theme, auto_add, api_key, &cli.format)?;
            }
        },
    }

    Ok(())
}
