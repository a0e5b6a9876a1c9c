//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kobj::config::{expand_path, Config};

/// How resolved knowledge objects are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Full records (id, labels, category, annotation_ids) as JSON
    Json,
    /// Compact records (id, category, labels) as JSON
    Summary,
}

#[derive(Parser)]
#[command(name = "kobj")]
#[command(about = "Resolve document annotations into knowledge objects")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Fuzzy match threshold, 0-100 (overrides config file)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster the annotations of a document JSON file
    Resolve {
        /// Document file with an `annotations` array
        input: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,
}

/// Load config from an explicit path or by discovery, then apply CLI overrides.
async fn load_config(path: Option<&str>, threshold: Option<u8>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            let path = expand_path(path);
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from_path(&path).await?
        }
        None => Config::load().await,
    };

    if let Some(threshold) = threshold {
        tracing::debug!(
            "fuzzy threshold {} overridden to {} on the command line",
            config.resolution.fuzzy_threshold,
            threshold
        );
        config.resolution.fuzzy_threshold = threshold;
    }
    Ok(config)
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.threshold).await?;

    match cli.command {
        Commands::Resolve { input, format } => {
            resolve::cmd_resolve(&config, &input, format).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
        },
    }
}
