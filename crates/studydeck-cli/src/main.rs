//! StudyDeck CLI
//!
//! Command-line interface and HTTP server for the StudyDeck catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use studydeck_core::{Catalog, CatalogError, Config};

mod commands;
mod logging;
mod output;
mod server;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "studydeck")]
#[command(about = "StudyDeck - study catalog of categories, subtopics and flashcard sets")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides STUDYDECK_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (defaults to bind_addr from config)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage subtopics of a category
    Subtopic {
        #[command(subcommand)]
        command: SubtopicCommands,
    },
    /// Manage study sets of a subtopic
    Set {
        #[command(subcommand)]
        command: SetCommands,
    },
    /// Show document location and contents
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories with set and card totals
    #[command(alias = "ls")]
    List,
    /// Create a category
    #[command(alias = "create")]
    Add {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
enum SubtopicCommands {
    /// List subtopics of a category
    #[command(alias = "ls")]
    List {
        /// Category ID
        category_id: String,
    },
    /// Create a subtopic
    #[command(alias = "create")]
    Add {
        /// Category ID
        category_id: String,
        /// Subtopic name
        name: String,
    },
}

#[derive(Subcommand)]
enum SetCommands {
    /// List study sets of a subtopic
    #[command(alias = "ls")]
    List {
        /// Category ID
        category_id: String,
        /// Subtopic ID
        subtopic_id: String,
    },
    /// Create a study set
    #[command(alias = "create")]
    Add {
        /// Category ID
        category_id: String,
        /// Subtopic ID
        subtopic_id: String,
        /// Set name
        name: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, document_file, bind_addr)
        key: String,
        /// New value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    logging::init(matches!(cli.command, Commands::Serve { .. }), cli.verbose);

    // Config commands work without a catalog
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    let catalog = Catalog::open(&config);

    let result = match cli.command {
        Commands::Serve { bind } => commands::serve::run(catalog, &config, bind).await,
        Commands::Category { command } => handle_category_command(command, &catalog, &output),
        Commands::Subtopic { command } => handle_subtopic_command(command, &catalog, &output),
        Commands::Set { command } => handle_set_command(command, &catalog, &output),
        Commands::Status => commands::status::show(&catalog, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    if let Err(ref err) = result {
        print_storage_hint(err);
    }

    result
}

fn handle_category_command(
    command: CategoryCommands,
    catalog: &Catalog,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::List => commands::category::list(catalog, output),
        CategoryCommands::Add { name } => commands::category::add(catalog, name, output),
    }
}

fn handle_subtopic_command(
    command: SubtopicCommands,
    catalog: &Catalog,
    output: &Output,
) -> Result<()> {
    match command {
        SubtopicCommands::List { category_id } => {
            commands::subtopic::list(catalog, category_id, output)
        }
        SubtopicCommands::Add { category_id, name } => {
            commands::subtopic::add(catalog, category_id, name, output)
        }
    }
}

fn handle_set_command(command: SetCommands, catalog: &Catalog, output: &Output) -> Result<()> {
    match command {
        SetCommands::List {
            category_id,
            subtopic_id,
        } => commands::set::list(catalog, category_id, subtopic_id, output),
        SetCommands::Add {
            category_id,
            subtopic_id,
            name,
        } => commands::set::add(catalog, category_id, subtopic_id, name, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Suggest a fix when a write failed for a storage reason
fn print_storage_hint(err: &anyhow::Error) {
    if let Some(CatalogError::Storage(storage)) = err.downcast_ref::<CatalogError>() {
        if let Some(hint) = storage.recovery_suggestion() {
            eprintln!("Hint: {}", hint);
        }
    }
}
