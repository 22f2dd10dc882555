//! Entry point for the `osrm-table` command.
#![forbid(unsafe_code)]

use osrm_table_cli::CliError;

fn main() {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();
    match osrm_table_cli::run() {
        Ok(()) => {}
        // Lets clap print help and version text with its own exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("osrm-table: {err}");
            std::process::exit(1);
        }
    }
}
