//! Error types emitted by the `osrm-table` CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`; large sources are boxed.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osrm_table_core::{InputError, ParseMeasureError, TableError};
use osrm_table_http::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the `osrm-table` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable name.
        env: &'static str,
    },
    /// The measure list named an unknown measure.
    #[error(transparent)]
    InvalidMeasures(#[from] ParseMeasureError),
    /// Opening a point file failed.
    #[error("failed to open {field} file {path:?}: {source}")]
    OpenInput {
        /// Flag the path came from.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// A point file was not valid JSON of a supported shape.
    #[error("failed to parse {field} file {path:?}: {source}")]
    ParseInput {
        /// Flag the path came from.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A point file looked like GeoJSON but could not be decoded.
    #[error("failed to parse GeoJSON in {field} file {path:?}: {source}")]
    ParseGeoJson {
        /// Flag the path came from.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: Box<geojson::Error>,
    },
    /// A point file could not be normalised into points.
    #[error("invalid {field} file {path:?}: {source}")]
    InvalidInput {
        /// Flag the path came from.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Normaliser error.
        #[source]
        source: InputError,
    },
    /// The supplied point files do not form a valid request.
    #[error(transparent)]
    Request(#[from] InputError),
    /// Constructing the table client failed.
    #[error("failed to build table client for {base_url:?}: {source}")]
    BuildClient {
        /// Configured server.
        base_url: String,
        /// Construction error.
        #[source]
        source: ClientBuildError,
    },
    /// The table request failed.
    #[error(transparent)]
    Table(#[from] TableError),
    /// Serialising the result failed.
    #[error("failed to serialise table result: {0}")]
    SerialiseResult(#[source] serde_json::Error),
    /// Writing the result failed.
    #[error("failed to write table result: {0}")]
    WriteOutput(#[source] std::io::Error),
}
