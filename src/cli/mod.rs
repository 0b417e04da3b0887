use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod group;

/// mzdeiso - Isotope pattern grouping for LC-MS feature tables
#[derive(Parser)]
#[command(name = "mzdeiso")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group isotopic features of a feature table into single rows
    Group(group::GroupArgs),

    /// Generate a demo feature table with known isotope clusters
    Demo {
        /// Output CSV file path
        #[arg(value_name = "OUTPUT", default_value = "demo_features.csv")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Group(args) => group::run(args),
        Commands::Demo { output } => demo::run(output),
    }
}
