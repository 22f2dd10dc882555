//! Command-line interface for querying OSRM travel-time tables.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod input;
mod table;

pub use error::CliError;

const ARG_LOCATIONS: &str = "locations";
const ARG_SOURCES: &str = "sources";
const ARG_DESTINATIONS: &str = "destinations";
const ARG_MEASURES: &str = "measures";
const ARG_EXCLUDE: &str = "exclude";
const ARG_POLYLINE: &str = "polyline";
const ARG_SERVER_URL: &str = "server-url";
const ARG_PROFILE: &str = "profile";
const ARG_MAX_ATTEMPTS: &str = "max-attempts";
const ARG_RETRY_DELAY_MS: &str = "retry-delay-ms";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_MAX_CELLS: &str = "max-cells";
const ARG_MAX_URL_LENGTH: &str = "max-url-length";
const ENV_LOCATIONS: &str = "OSRM_TABLE_CMDS_TABLE_LOCATIONS";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Table(args) => table::run_table(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "osrm-table",
    about = "Travel-time and distance matrices from an OSRM server",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Request a duration and/or distance table for a set of points.
    Table(table::TableArgs),
}

#[cfg(test)]
mod tests;
