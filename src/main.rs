use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use miette::{miette, IntoDiagnostic};

use thesaurus_tui::config::AppConfig;
use thesaurus_tui::core::credentials::CredentialManager;
use thesaurus_tui::core::logging::{self, LogTarget};
use thesaurus_tui::core::thesaurus::{
    DictionaryApiClient, ListMode, QueryController, SearchOutcome,
};
use thesaurus_tui::tui::views::search::build_sections;

#[derive(Parser)]
#[command(
    name = "thesaurus",
    version,
    about = "Incremental synonym/antonym search in the terminal",
    long_about = "Search a thesaurus as you type.\n\n\
                  Without a subcommand, opens the interactive search. \
                  Use `lookup` for a one-shot query."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// List mode: entries (e), synonyms (s), antonyms (a), or both (b).
    #[arg(long, short, value_name = "MODE", global = true)]
    mode: Option<ListMode>,
}

#[derive(Subcommand)]
enum Command {
    /// Look up one word and print the results.
    Lookup {
        /// Word to look up; matched exactly against headwords.
        word: String,

        /// Print the normalized entries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage the API key stored in the system keyring.
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Store an API key.
    Set {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Remove the stored API key.
    Clear,
    /// Show where the API key would be taken from.
    Status,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if let Some(mode) = cli.mode {
        config.search.mode = mode;
    }

    let target = if cli.command.is_some() {
        LogTarget::Cli
    } else {
        LogTarget::Tui
    };
    let _log_guard = logging::init(&config.data_dir(), &config.logging.level, target);
    log::info!("{} v{} starting", thesaurus_tui::NAME, thesaurus_tui::VERSION);

    match cli.command {
        None => run_interactive(&config).await,
        Some(Command::Lookup { word, json }) => run_lookup(&config, &word, json).await,
        Some(Command::Key { action }) => run_key(&config, action),
    }
}

fn build_controller(config: &AppConfig) -> miette::Result<QueryController> {
    let api_key = config.api.resolve_api_key()?;
    let client = DictionaryApiClient::from_config(&config.api, api_key);
    Ok(QueryController::start(Arc::new(client)))
}

async fn run_interactive(config: &AppConfig) -> miette::Result<()> {
    let controller = build_controller(config)?;
    thesaurus_tui::tui::run(config, controller)
        .await
        .into_diagnostic()?;
    log::info!("Session ended");
    Ok(())
}

async fn run_lookup(config: &AppConfig, word: &str, json: bool) -> miette::Result<()> {
    let mut controller = build_controller(config)?;
    controller.submit(word);

    match controller.settle().await {
        Some(SearchOutcome::Failed(failure)) => {
            return Err(miette!("{}: {}", failure.title, failure.message));
        }
        Some(SearchOutcome::TimedOut) => return Err(miette!("Request timed out")),
        Some(SearchOutcome::Cancelled) => return Err(miette!("Request cancelled")),
        Some(SearchOutcome::Applied { .. } | SearchOutcome::Stale) | None => {}
    }

    let results = &controller.state().results;
    if json {
        let out = serde_json::to_string_pretty(results).into_diagnostic()?;
        println!("{out}");
        return Ok(());
    }

    if results.is_empty() {
        eprintln!("{}", style(format!("No entries for '{word}'")).yellow());
        return Ok(());
    }

    let mode = config.search.mode;
    for section in build_sections(results, mode) {
        match section.subtitle {
            Some(ref subtitle) => println!(
                "{}  {}",
                style(&section.title).cyan().bold(),
                style(subtitle).dim()
            ),
            None => println!("{}", style(&section.title).cyan().bold()),
        }
        for row in &section.rows {
            match row.subtitle {
                Some(ref subtitle) => println!("  {}  {}", row.title, style(subtitle).dim()),
                None => println!("  {}", row.title),
            }
            if mode == ListMode::Entries {
                for (idx, sense) in results[row.entry].senses.iter().enumerate() {
                    println!("    {} {}", style(format!("{}.", idx + 1)).dim(), sense.definition);
                }
            }
        }
        println!();
    }
    Ok(())
}

fn run_key(config: &AppConfig, action: KeyCommand) -> miette::Result<()> {
    let credentials = CredentialManager::new();
    match action {
        KeyCommand::Set { key } => {
            credentials.store_api_key(&key).into_diagnostic()?;
            println!(
                "{} API key stored in keyring service '{}'",
                style("✓").green(),
                credentials.service()
            );
        }
        KeyCommand::Clear => {
            credentials.delete_api_key().into_diagnostic()?;
            println!("{} API key removed from keyring", style("✓").green());
        }
        KeyCommand::Status => {
            let inline = config
                .api
                .api_key
                .as_deref()
                .is_some_and(|k| !k.trim().is_empty());
            let env = std::env::var(&config.api.api_key_env)
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false);
            let keyring = credentials.has_api_key();

            let mark = |present: bool| {
                if present {
                    style("set").green()
                } else {
                    style("unset").dim()
                }
            };
            println!("config file     {}", mark(inline));
            println!("{:<15} {}", config.api.api_key_env, mark(env));
            println!("keyring         {}", mark(keyring));

            if !(inline || env || keyring) {
                config.api.resolve_api_key_with(|| None)?;
            }
        }
    }
    Ok(())
}
