//! Loading point files.
//!
//! A point file is JSON in one of two shapes:
//!
//! - an array of `[id, lon, lat]` rows, read as tabular points;
//! - a GeoJSON `FeatureCollection`, `Feature` or bare geometry, read as a
//!   geometry layer. Feature ids become row names.

use std::io::BufReader;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use geojson::feature::Id;
use geojson::{Feature, GeoJson, JsonObject};
use osrm_table_core::{
    GeometryFeature, GeometryLayer, InputError, Locations, TabularPoints, WGS84_EPSG,
};
use serde_json::Value;

use crate::CliError;

/// Read the point file at `path`, supplied through the `field` flag.
pub(crate) fn load_locations(path: &Utf8Path, field: &'static str) -> Result<Locations, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenInput {
            field,
            path: path.to_path_buf(),
            source,
        }
    })?;
    let document: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
            field,
            path: path.to_path_buf(),
            source,
        })?;
    parse_document(document, path, field)
}

fn parse_document(
    document: Value,
    path: &Utf8Path,
    field: &'static str,
) -> Result<Locations, CliError> {
    if document.is_array() {
        let rows: TabularPoints =
            serde_json::from_value(document).map_err(|source| CliError::ParseInput {
                field,
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(rows.into());
    }
    let geojson = GeoJson::from_json_value(document).map_err(|source| CliError::ParseGeoJson {
        field,
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    geometry_layer(geojson)
        .map(Locations::from)
        .map_err(|source| CliError::InvalidInput {
            field,
            path: path.to_path_buf(),
            source,
        })
}

fn geometry_layer(geojson: GeoJson) -> Result<GeometryLayer, InputError> {
    let (features, epsg) = match geojson {
        GeoJson::FeatureCollection(collection) => {
            let epsg = declared_epsg(collection.foreign_members.as_ref());
            (collection.features, epsg)
        }
        GeoJson::Feature(feature) => {
            let epsg = declared_epsg(feature.foreign_members.as_ref());
            (vec![feature], epsg)
        }
        GeoJson::Geometry(geometry) => {
            let epsg = declared_epsg(geometry.foreign_members.as_ref());
            (vec![Feature::from(geometry)], epsg)
        }
    };
    let features = features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| geometry_feature(index.saturating_add(1), feature))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GeometryLayer { epsg, features })
}

fn geometry_feature(row: usize, feature: Feature) -> Result<GeometryFeature, InputError> {
    let row_name = row_name(&feature);
    let geometry = feature.geometry.ok_or(InputError::EmptyGeometry { row })?;
    let kind = geometry_kind(&geometry.value);
    let converted = geo::Geometry::<f64>::try_from(geometry)
        .map_err(|_| InputError::UnsupportedGeometry { row, kind })?;
    Ok(GeometryFeature::new(row_name, converted))
}

fn row_name(feature: &Feature) -> Option<String> {
    match &feature.id {
        Some(Id::String(id)) => Some(id.clone()),
        Some(Id::Number(id)) => Some(id.to_string()),
        None => match feature.property("id") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        },
    }
}

const fn geometry_kind(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// EPSG code of a legacy `crs` member; RFC 7946 documents without one are
/// WGS 84.
fn declared_epsg(foreign_members: Option<&JsonObject>) -> Option<u32> {
    let Some(crs) = foreign_members.and_then(|members| members.get("crs")) else {
        return Some(WGS84_EPSG);
    };
    let name = crs.pointer("/properties/name").and_then(Value::as_str)?;
    if name.ends_with("CRS84") {
        return Some(WGS84_EPSG);
    }
    name.rsplit(':').next()?.parse().ok()
}
