mod transform;
mod validate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datamask")]
#[command(version)]
#[command(about = "Generate random or noised replacement values for sensitive columns", long_about = None)]
pub struct Cli {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform values with a configured transformer
    Transform {
        /// YAML transformer config
        #[arg(short, long)]
        config: PathBuf,

        /// Values to transform (one per line from stdin when omitted)
        values: Vec<String>,

        /// Output results as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Check a transformer config without transforming anything
    Validate {
        /// YAML transformer config
        #[arg(short, long)]
        config: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Transform {
            config,
            values,
            json,
        } => transform::run(config, values, json),
        Commands::Validate { config, json } => validate::run(config, json),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "datamask", &mut io::stdout());
            Ok(())
        }
    }
}
