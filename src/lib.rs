//! Facade crate for the OSRM table client.
//!
//! This crate re-exports the core request and result types, and the HTTP
//! client behind the `http` feature.

#![forbid(unsafe_code)]

pub use osrm_table_core::{
    CoordinateEncoding, GeometryFeature, GeometryLayer, InputError, LabelledMatrix, Locations,
    Measure, ParseMeasureError, Point, PointRole, PointSet, TableError, TableMode, TableProvider,
    TableRequest, TableResult, TabularPoints, TransportError, parse_measures,
};

#[cfg(feature = "http")]
pub use osrm_table_http::{
    ClientBuildError, OsrmTableClient, OsrmTableConfig, RequestLimits, RetryPolicy, ServerConfig,
};
