//! TransQuest CLI - manage cached checkpoints and score translations locally
//!
//! Examples:
//!   transquest models list
//!   transquest pull en_de_hter
//!   transquest directions
//!   transquest estimate --direction en-de --source "Welcome" --target "Herzlich willkommen"

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// TransQuest - translation quality estimation with cross-lingual transformers
#[derive(Parser)]
#[command(
    name = "transquest",
    about = "Translation quality estimation with cross-lingual transformers",
    version = env!("CARGO_PKG_VERSION"),
    arg_required_else_help = true,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true, value_name = "PATH", env = "TRANSQUEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "table"
    )]
    pub output_format: OutputFormat,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage models
    #[command(name = "models", alias = "model")]
    Models {
        #[command(subcommand)]
        command: ModelCommands,
    },

    /// Download a catalog model into the local cache
    #[command(name = "pull", alias = "download")]
    Pull {
        /// Model name
        ///
        /// Examples: en_de, en_zh, en_de_hter, en_de_da
        model: String,

        /// Force re-download even if the model is cached
        #[arg(short, long)]
        force: bool,
    },

    /// Show the supported translation directions and their models
    #[command(name = "directions")]
    Directions,

    /// Score one translation with the HTER, DA and word-level models
    #[command(name = "estimate", alias = "qe")]
    Estimate {
        /// Translation direction (en-de, en-zh, multilingual)
        #[arg(short, long, default_value = "en-de")]
        direction: String,

        /// Source sentence
        #[arg(short, long)]
        source: String,

        /// Target sentence (the translation)
        #[arg(short, long)]
        target: String,
    },
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// List catalog models and their cache status
    #[command(name = "list", alias = "ls")]
    List {
        /// Show only downloaded models
        #[arg(short, long)]
        local: bool,
    },

    /// Remove a cached model
    #[command(name = "rm", alias = "remove")]
    Rm {
        /// Model name
        model: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "transquest=debug,transquest_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Models { command } => {
            commands::models::execute(command, config, cli.output_format)?;
        }

        Commands::Pull { model, force } => {
            commands::pull::execute(&model, force, config)?;
        }

        Commands::Directions => {
            commands::directions::execute(&config, cli.output_format)?;
        }

        Commands::Estimate {
            direction,
            source,
            target,
        } => {
            commands::estimate::execute(
                commands::estimate::EstimateArgs {
                    direction,
                    source,
                    target,
                },
                config,
                cli.output_format,
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_estimate_with_global_format() {
        let cli = Cli::try_parse_from([
            "transquest",
            "estimate",
            "--direction",
            "en-zh",
            "--source",
            "Welcome",
            "--target",
            "欢迎",
            "--output-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.output_format, OutputFormat::Json);
        match cli.command {
            Commands::Estimate {
                direction,
                source,
                target,
            } => {
                assert_eq!(direction, "en-zh");
                assert_eq!(source, "Welcome");
                assert_eq!(target, "欢迎");
            }
            _ => panic!("expected estimate"),
        }
    }

    #[test]
    fn estimate_defaults_to_en_de() {
        let cli = Cli::try_parse_from(["transquest", "estimate", "-s", "a", "-t", "b"]).unwrap();
        match cli.command {
            Commands::Estimate { direction, .. } => assert_eq!(direction, "en-de"),
            _ => panic!("expected estimate"),
        }
    }

    #[test]
    fn estimate_requires_target() {
        assert!(Cli::try_parse_from(["transquest", "estimate", "-s", "a"]).is_err());
    }

    #[test]
    fn parses_nested_model_commands() {
        let cli = Cli::try_parse_from(["transquest", "models", "ls", "--local"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Models {
                command: ModelCommands::List { local: true }
            }
        ));

        let cli = Cli::try_parse_from(["transquest", "pull", "en_de_hter", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Pull { force: true, .. }));
    }
}
