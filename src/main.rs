use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use datavault::VaultConfig;

mod commands;

use commands::hub::HubAction;
use commands::link::LinkAction;
use commands::satellite::SatAction;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Inspect and load Data Vault hub, link and satellite tables", long_about = None)]
struct Cli {
    /// Vault configuration file
    #[arg(global = true, short, long, default_value = "dv2.toml")]
    config: PathBuf,

    /// Output results as JSON
    #[arg(global = true, short, long)]
    json: bool,

    /// Log every statement issued
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with a configured hub table
    Hub {
        /// Hub name from the configuration
        name: String,

        #[command(subcommand)]
        action: HubAction,
    },

    /// Work with a configured link table
    Link {
        /// Link name from the configuration
        name: String,

        #[command(subcommand)]
        action: LinkAction,
    },

    /// Work with a configured satellite table
    Sat {
        /// Satellite name from the configuration
        name: String,

        #[command(subcommand)]
        action: SatAction,
    },

    /// Validate the configuration and list its tables
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = VaultConfig::load_from_file(&cli.config)?;

    match cli.command {
        Commands::Hub { name, action } => commands::hub::execute(&config, &name, action, cli.json),
        Commands::Link { name, action } => {
            commands::link::execute(&config, &name, action, cli.json)
        }
        Commands::Sat { name, action } => {
            commands::satellite::execute(&config, &name, action, cli.json)
        }
        Commands::Check => commands::check::execute(&config, cli.json),
    }
}
