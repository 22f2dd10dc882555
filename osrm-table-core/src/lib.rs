//! Core domain types for OSRM table requests.
//!
//! This crate normalises point inputs into ordered [`PointSet`] values,
//! resolves them into a [`TableRequest`], and defines the [`TableResult`]
//! bundle and [`TableError`] taxonomy shared by every [`TableProvider`].
//! It performs no I/O; see `osrm-table-http` for the HTTP client.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub mod input;
mod matrix;
mod measure;
mod point;
mod provider;
mod request;
mod result;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use error::{TableError, TransportError};
pub use input::{
    Cell, Field, GeometryFeature, GeometryLayer, InputError, Locations, TabularPoints, WGS84_EPSG,
};
pub use matrix::{LabelledMatrix, MatrixShapeError};
pub use measure::{Measure, ParseMeasureError, parse_measures};
pub use point::{Point, PointRole, PointSet};
pub use provider::TableProvider;
pub use request::{CoordinateEncoding, TableMode, TableRequest};
pub use result::TableResult;
