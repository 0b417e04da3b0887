//! # mzdeiso
//!
//! Command-line front end for isotope pattern grouping.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a demo feature table
//! mzdeiso demo features.csv
//!
//! # Deisotope it, allowing charges up to 3
//! mzdeiso -v group features.csv grouped.csv --max-charge 3
//!
//! # Use a TOML config file and export JSON with processing history
//! mzdeiso group features.csv --config mzdeiso.toml --format json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
