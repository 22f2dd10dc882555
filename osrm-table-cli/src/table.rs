//! Table command implementation.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osrm_table_core::{
    CoordinateEncoding, Locations, Measure, TableProvider, TableRequest, TableResult,
    parse_measures,
};
use osrm_table_http::{DEFAULT_BASE_URL, OsrmTableClient, OsrmTableConfig, RetryPolicy};
use serde::{Deserialize, Serialize};

use crate::input::load_locations;
use crate::{
    ARG_DESTINATIONS, ARG_EXCLUDE, ARG_LOCATIONS, ARG_MAX_ATTEMPTS, ARG_MAX_CELLS,
    ARG_MAX_URL_LENGTH, ARG_MEASURES, ARG_POLYLINE, ARG_PROFILE, ARG_RETRY_DELAY_MS,
    ARG_SERVER_URL, ARG_SOURCES, ARG_TIMEOUT_SECS, CliError, ENV_LOCATIONS,
};

/// CLI arguments for the `table` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "table",
    long_about = "Request travel-time and distance matrices from an OSRM \
                 server. Points are read from JSON files holding either \
                 [id, lon, lat] rows or GeoJSON features. Pass --locations \
                 for an all-pairs table, or --sources with --destinations \
                 for a bipartite one. Every option can also come from a \
                 configuration file or OSRM_TABLE_CMDS_TABLE_* variables.",
    about = "Request a travel-time table"
)]
#[ortho_config(prefix = "OSRM_TABLE")]
pub(crate) struct TableArgs {
    /// Points for an all-pairs table.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Origin points; all-pairs when given without destinations.
    #[arg(long = ARG_SOURCES, value_name = "path")]
    #[serde(default)]
    pub(crate) sources: Option<Utf8PathBuf>,
    /// Destination points; requires sources.
    #[arg(long = ARG_DESTINATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) destinations: Option<Utf8PathBuf>,
    /// Comma-separated measures: `duration`, `distance` (default `duration`).
    #[arg(long = ARG_MEASURES, value_name = "list")]
    #[serde(default)]
    pub(crate) measures: Option<String>,
    /// Road classes to avoid, e.g. `toll,motorway`.
    #[arg(long = ARG_EXCLUDE, value_name = "classes")]
    #[serde(default)]
    pub(crate) exclude: Option<String>,
    /// Send coordinates polyline-encoded to shorten the URL.
    #[arg(
        long = ARG_POLYLINE,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) polyline: Option<bool>,
    /// Base URL of the OSRM server (default `http://localhost:5000`).
    #[arg(long = ARG_SERVER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) server_url: Option<String>,
    /// Routing profile (default `driving`).
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Attempts before giving up on transport failures.
    #[arg(long = ARG_MAX_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
    /// Pause between attempts, in milliseconds.
    #[arg(long = ARG_RETRY_DELAY_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) retry_delay_ms: Option<u64>,
    /// Per-attempt timeout, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Largest accepted sources x destinations product; 0 removes the cap.
    #[arg(long = ARG_MAX_CELLS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_cells: Option<usize>,
    /// Longest accepted request URL, in characters.
    #[arg(long = ARG_MAX_URL_LENGTH, value_name = "chars")]
    #[serde(default)]
    pub(crate) max_url_length: Option<usize>,
}

impl TableArgs {
    pub(crate) fn into_config(self) -> Result<TableConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        TableConfig::try_from(merged)
    }
}

/// Resolved `table` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct TableConfig {
    pub(crate) locations: Option<Utf8PathBuf>,
    pub(crate) sources: Option<Utf8PathBuf>,
    pub(crate) destinations: Option<Utf8PathBuf>,
    pub(crate) measures: Vec<Measure>,
    pub(crate) exclude: Option<String>,
    pub(crate) encoding: CoordinateEncoding,
    pub(crate) client: OsrmTableConfig,
}

impl TryFrom<TableArgs> for TableConfig {
    type Error = CliError;

    fn try_from(args: TableArgs) -> Result<Self, Self::Error> {
        if args.locations.is_none() && args.sources.is_none() {
            return Err(CliError::MissingArgument {
                field: ARG_LOCATIONS,
                env: ENV_LOCATIONS,
            });
        }
        let measures = match args.measures.as_deref() {
            Some(list) => parse_measures(list)?,
            None => vec![Measure::Duration],
        };
        let encoding = if args.polyline.unwrap_or(false) {
            CoordinateEncoding::Polyline
        } else {
            CoordinateEncoding::Plain
        };
        let client = client_config(&args);
        Ok(Self {
            locations: args.locations,
            sources: args.sources,
            destinations: args.destinations,
            measures,
            exclude: args.exclude.filter(|classes| !classes.trim().is_empty()),
            encoding,
            client,
        })
    }
}

fn client_config(args: &TableArgs) -> OsrmTableConfig {
    let base_url = args.server_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    let mut config = OsrmTableConfig::new(base_url);
    if let Some(profile) = args.profile.as_deref() {
        config = config.with_profile(profile);
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if args.max_attempts.is_some() || args.retry_delay_ms.is_some() {
        let defaults = RetryPolicy::default();
        let retry = RetryPolicy::new(
            args.max_attempts.unwrap_or(defaults.max_attempts()),
            args.retry_delay_ms
                .map_or(defaults.delay(), Duration::from_millis),
        );
        config = config.with_retry(retry);
    }
    let mut limits = config.server.limits();
    if let Some(cells) = args.max_cells {
        limits.max_cells = (cells > 0).then_some(cells);
    }
    if let Some(length) = args.max_url_length {
        limits.max_url_length = length;
    }
    config.with_limits(limits)
}

/// Builds the table provider for the current invocation.
pub(crate) trait TableProviderBuilder {
    fn build(&self, config: &TableConfig) -> Result<Box<dyn TableProvider>, CliError>;
}

pub(crate) struct DefaultTableProviderBuilder;

impl TableProviderBuilder for DefaultTableProviderBuilder {
    fn build(&self, config: &TableConfig) -> Result<Box<dyn TableProvider>, CliError> {
        let client = OsrmTableClient::with_config(config.client.clone()).map_err(|source| {
            CliError::BuildClient {
                base_url: config.client.server.base_url().to_owned(),
                source,
            }
        })?;
        Ok(Box::new(client))
    }
}

pub(crate) fn run_table(args: TableArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultTableProviderBuilder;
    run_table_with(args, &builder, &mut stdout)
}

pub(crate) fn run_table_with(
    args: TableArgs,
    builder: &dyn TableProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_table(&config, builder, writer)
}

pub(crate) fn execute_table(
    config: &TableConfig,
    builder: &dyn TableProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let request = build_request(config)?;
    let provider = builder.build(config)?;
    let result = provider.table(&request)?;
    info!(
        "received {} x {} table from {}",
        result.sources.len(),
        result.destinations.len(),
        config.client.server.base_url()
    );
    write_table_result(writer, &result)
}

/// Load the configured point files and resolve them into a request.
pub(crate) fn build_request(config: &TableConfig) -> Result<TableRequest, CliError> {
    let locations = load_optional(config.locations.as_ref(), ARG_LOCATIONS)?;
    let sources = load_optional(config.sources.as_ref(), ARG_SOURCES)?;
    let destinations = load_optional(config.destinations.as_ref(), ARG_DESTINATIONS)?;
    let mut request = TableRequest::from_inputs(locations, sources, destinations)?
        .with_measures(config.measures.iter().copied())
        .with_encoding(config.encoding);
    if let Some(classes) = config.exclude.as_deref() {
        request = request.with_exclude(classes);
    }
    Ok(request)
}

fn load_optional(
    path: Option<&Utf8PathBuf>,
    field: &'static str,
) -> Result<Option<Locations>, CliError> {
    path.map(|file| load_locations(file, field)).transpose()
}

fn write_table_result(writer: &mut dyn Write, result: &TableResult) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(result).map_err(CliError::SerialiseResult)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<TableConfig, CliError> {
    let merged = TableArgs::merge_from_layers(layers).map_err(CliError::from)?;
    TableConfig::try_from(merged)
}
