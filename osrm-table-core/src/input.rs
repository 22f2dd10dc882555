//! Normalise heterogeneous point inputs into [`PointSet`] values.
//!
//! Two input shapes are accepted:
//!
//! - [`TabularPoints`]: rows whose first three cells are taken positionally as
//!   `(id, lon, lat)`. Extra cells are ignored and coordinate ranges are not
//!   checked.
//! - [`GeometryLayer`]: features carrying a `geo` geometry and an optional
//!   native row name. Points are used directly; polygonal geometries are
//!   reduced to a centroid.

use std::fmt;

use geo::{Area, Centroid, Coord, Geometry, MultiPolygon, Polygon};
use thiserror::Error;

use crate::point::{Point, PointRole, PointSet};

/// EPSG code of WGS 84 longitude/latitude, the only CRS the service accepts.
pub const WGS84_EPSG: u32 = 4326;

/// Positional field of a tabular record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// First cell.
    Id,
    /// Second cell.
    Lon,
    /// Third cell.
    Lat,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Id => "id",
            Self::Lon => "lon",
            Self::Lat => "lat",
        };
        f.write_str(name)
    }
}

/// Errors raised while normalising inputs. Rows are numbered from one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// No point set was supplied at all.
    #[error("no locations supplied: pass locations, or sources with optional destinations")]
    NoLocations,
    /// Destinations were supplied without sources.
    #[error("destinations were supplied without sources")]
    MissingSources,
    /// Locations were combined with explicit sources or destinations.
    #[error("locations cannot be combined with sources or destinations")]
    ConflictingInputs,
    /// A supplied point set was empty.
    #[error("{role} must contain at least one point")]
    EmptyPointSet {
        /// Which set was empty.
        role: PointRole,
    },
    /// A row had fewer than three cells.
    #[error("row {row} has no {field} field")]
    MissingField {
        /// Row number.
        row: usize,
        /// First missing field.
        field: Field,
    },
    /// A cell could not be interpreted.
    #[error("row {row} has a malformed {field} field: {value}")]
    MalformedField {
        /// Row number.
        row: usize,
        /// Offending field.
        field: Field,
        /// Rendering of the offending cell.
        value: String,
    },
    /// The geometry layer did not declare a coordinate reference system.
    #[error("geometry layer has no coordinate reference system")]
    MissingCrs,
    /// The geometry layer is not expressed in WGS 84.
    #[error("geometry layer uses EPSG:{epsg}; reproject to EPSG:4326 first")]
    UnsupportedCrs {
        /// Declared EPSG code.
        epsg: u32,
    },
    /// The geometry kind cannot be reduced to a single location.
    #[error("row {row} has an unsupported {kind} geometry")]
    UnsupportedGeometry {
        /// Row number.
        row: usize,
        /// Geometry kind name.
        kind: &'static str,
    },
    /// A polygonal geometry had no centroid.
    #[error("row {row} has an empty geometry")]
    EmptyGeometry {
        /// Row number.
        row: usize,
    },
}

/// One tabular cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Cell {
    /// Missing value.
    Null,
    /// Whole number, kept exact so large numeric ids survive.
    Integer(i64),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Rows of positional `(id, lon, lat)` cells.
///
/// # Examples
///
/// ```
/// use osrm_table_core::{PointRole, TabularPoints};
///
/// let table = TabularPoints::from_records([("a", 2.35, 48.85), ("b", 2.29, 48.86)]);
/// let set = table.into_point_set(PointRole::Locations)?;
/// assert_eq!(set.ids().collect::<Vec<_>>(), vec!["a", "b"]);
/// # Ok::<(), osrm_table_core::InputError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TabularPoints {
    /// Raw rows.
    pub rows: Vec<Vec<Cell>>,
}

impl TabularPoints {
    /// Wrap raw rows.
    #[must_use]
    pub const fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build rows from already typed `(id, lon, lat)` records.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let rows = records
            .into_iter()
            .map(|(id, lon, lat)| vec![Cell::Text(id.into()), Cell::Number(lon), Cell::Number(lat)])
            .collect();
        Self { rows }
    }

    /// Convert every row into a [`Point`], preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingField`] or [`InputError::MalformedField`]
    /// for the first offending row, and [`InputError::EmptyPointSet`] when
    /// there are no rows.
    pub fn into_point_set(self, role: PointRole) -> Result<PointSet, InputError> {
        let points = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| tabular_point(index.saturating_add(1), row))
            .collect::<Result<Vec<_>, _>>()?;
        PointSet::new(points, role)
    }
}

fn tabular_point(row: usize, cells: Vec<Cell>) -> Result<Point, InputError> {
    let mut remaining = cells.into_iter();
    let mut next = |field| remaining.next().ok_or(InputError::MissingField { row, field });
    let id = next(Field::Id)?;
    let lon = next(Field::Lon)?;
    let lat = next(Field::Lat)?;
    Ok(Point {
        id: cell_id(row, id)?,
        lon: cell_number(row, Field::Lon, &lon)?,
        lat: cell_number(row, Field::Lat, &lat)?,
    })
}

fn cell_id(row: usize, cell: Cell) -> Result<String, InputError> {
    match cell {
        Cell::Text(text) => Ok(text),
        Cell::Integer(value) => Ok(value.to_string()),
        // `Display` for f64 drops the fractional part of integral values.
        Cell::Number(value) => Ok(value.to_string()),
        Cell::Null => Err(InputError::MalformedField {
            row,
            field: Field::Id,
            value: cell.to_string(),
        }),
    }
}

fn cell_number(row: usize, field: Field, cell: &Cell) -> Result<f64, InputError> {
    let malformed = || InputError::MalformedField {
        row,
        field,
        value: cell.to_string(),
    };
    match cell {
        Cell::Number(value) => Ok(*value),
        Cell::Integer(value) => value.to_string().parse().map_err(|_| malformed()),
        Cell::Text(text) => text.trim().parse().map_err(|_| malformed()),
        Cell::Null => Err(malformed()),
    }
}

/// A geometry with its native row name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryFeature {
    /// Native row identifier; the 1-based row number is used when absent.
    pub row_name: Option<String>,
    /// Feature geometry in the layer's CRS.
    pub geometry: Geometry,
}

impl GeometryFeature {
    /// Construct a feature.
    pub fn new(row_name: Option<String>, geometry: impl Into<Geometry>) -> Self {
        Self {
            row_name,
            geometry: geometry.into(),
        }
    }
}

/// A geometry layer: features plus the EPSG code of their CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryLayer {
    /// Declared CRS, if any.
    pub epsg: Option<u32>,
    /// Features in row order.
    pub features: Vec<GeometryFeature>,
}

impl GeometryLayer {
    /// Construct a layer already expressed in WGS 84.
    #[must_use]
    pub const fn wgs84(features: Vec<GeometryFeature>) -> Self {
        Self {
            epsg: Some(WGS84_EPSG),
            features,
        }
    }

    /// Reduce each feature to one location labelled by its row name.
    ///
    /// # Errors
    ///
    /// Fails when the CRS is absent or not WGS 84, when a geometry kind cannot
    /// be reduced to a location, or when the layer is empty.
    pub fn into_point_set(self, role: PointRole) -> Result<PointSet, InputError> {
        match self.epsg {
            None => return Err(InputError::MissingCrs),
            Some(WGS84_EPSG) => {}
            Some(epsg) => return Err(InputError::UnsupportedCrs { epsg }),
        }
        let points = self
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                let row = index.saturating_add(1);
                let coord = representative_coord(row, &feature.geometry)?;
                let id = feature.row_name.unwrap_or_else(|| row.to_string());
                Ok(Point::new(id, coord.x, coord.y))
            })
            .collect::<Result<Vec<_>, InputError>>()?;
        PointSet::new(points, role)
    }
}

fn representative_coord(row: usize, geometry: &Geometry) -> Result<Coord, InputError> {
    match geometry {
        Geometry::Point(point) => Ok(point.0),
        Geometry::Polygon(polygon) => polygon_centroid(row, polygon),
        Geometry::Rect(rect) => polygon_centroid(row, &rect.to_polygon()),
        Geometry::Triangle(triangle) => polygon_centroid(row, &triangle.to_polygon()),
        Geometry::MultiPolygon(multi) => largest_polygon_centroid(row, multi),
        Geometry::GeometryCollection(collection) => {
            let polygons: Vec<Polygon> = collection.iter().flat_map(collection_polygons).collect();
            if polygons.is_empty() {
                return Err(InputError::UnsupportedGeometry {
                    row,
                    kind: geometry_kind(geometry),
                });
            }
            largest_polygon_centroid(row, &MultiPolygon::new(polygons))
        }
        other => Err(InputError::UnsupportedGeometry {
            row,
            kind: geometry_kind(other),
        }),
    }
}

fn collection_polygons(geometry: &Geometry) -> Vec<Polygon> {
    match geometry {
        Geometry::Polygon(polygon) => vec![polygon.clone()],
        Geometry::MultiPolygon(multi) => multi.0.clone(),
        Geometry::Rect(rect) => vec![rect.to_polygon()],
        Geometry::Triangle(triangle) => vec![triangle.to_polygon()],
        Geometry::GeometryCollection(inner) => inner.iter().flat_map(collection_polygons).collect(),
        _ => Vec::new(),
    }
}

fn polygon_centroid(row: usize, polygon: &Polygon) -> Result<Coord, InputError> {
    polygon
        .centroid()
        .map(|point| point.0)
        .ok_or(InputError::EmptyGeometry { row })
}

fn largest_polygon_centroid(row: usize, multi: &MultiPolygon) -> Result<Coord, InputError> {
    let largest = multi
        .0
        .iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .ok_or(InputError::EmptyGeometry { row })?;
    polygon_centroid(row, largest)
}

const fn geometry_kind(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "point",
        Geometry::Line(_) => "line",
        Geometry::LineString(_) => "linestring",
        Geometry::Polygon(_) => "polygon",
        Geometry::MultiPoint(_) => "multipoint",
        Geometry::MultiLineString(_) => "multilinestring",
        Geometry::MultiPolygon(_) => "multipolygon",
        Geometry::GeometryCollection(_) => "geometrycollection",
        Geometry::Rect(_) => "rect",
        Geometry::Triangle(_) => "triangle",
    }
}

/// The closed set of accepted point inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Locations {
    /// Positional `(id, lon, lat)` rows.
    Tabular(TabularPoints),
    /// Geometry features labelled by row name.
    GeometryLayer(GeometryLayer),
}

impl Locations {
    /// Normalise into a [`PointSet`] for `role`.
    ///
    /// # Errors
    ///
    /// Propagates the variant's conversion error.
    pub fn into_point_set(self, role: PointRole) -> Result<PointSet, InputError> {
        match self {
            Self::Tabular(table) => table.into_point_set(role),
            Self::GeometryLayer(layer) => layer.into_point_set(role),
        }
    }
}

impl From<TabularPoints> for Locations {
    fn from(value: TabularPoints) -> Self {
        Self::Tabular(value)
    }
}

impl From<GeometryLayer> for Locations {
    fn from(value: GeometryLayer) -> Self {
        Self::GeometryLayer(value)
    }
}

impl From<Vec<Point>> for Locations {
    fn from(points: Vec<Point>) -> Self {
        Self::Tabular(TabularPoints::from_records(
            points.into_iter().map(|point| (point.id, point.lon, point.lat)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{GeometryCollection, LineString, point, polygon};
    use rstest::rstest;

    fn row(cells: Vec<Cell>) -> TabularPoints {
        TabularPoints::new(vec![cells])
    }

    #[rstest]
    fn tabular_rows_keep_order_and_ignore_extra_cells() {
        let table = TabularPoints::new(vec![
            vec!["b".into(), 2.0.into(), 3.0.into(), "extra".into()],
            vec!["a".into(), 4.0.into(), 5.0.into()],
        ]);
        let set = table
            .into_point_set(PointRole::Locations)
            .expect("rows should normalise");
        assert_eq!(
            set.into_inner(),
            vec![Point::new("b", 2.0, 3.0), Point::new("a", 4.0, 5.0)]
        );
    }

    #[rstest]
    #[case(Cell::Number(7.0), "7")]
    #[case(Cell::Number(7.5), "7.5")]
    #[case(Cell::Integer(9_007_199_254_740_993), "9007199254740993")]
    #[case(Cell::Text("depot".into()), "depot")]
    fn tabular_ids_accept_text_and_numbers(#[case] id: Cell, #[case] expected: &str) {
        let set = row(vec![id, 1.0.into(), 2.0.into()])
            .into_point_set(PointRole::Sources)
            .expect("row should normalise");
        assert_eq!(set.ids().next(), Some(expected));
    }

    #[rstest]
    fn tabular_coordinates_accept_numeric_text() {
        let set = row(vec!["a".into(), " 2.5 ".into(), "-48.1".into()])
            .into_point_set(PointRole::Locations)
            .expect("numeric text should parse");
        assert_eq!(set.coords().next(), Some(Coord { x: 2.5, y: -48.1 }));
    }

    #[rstest]
    #[case(vec![], Field::Id)]
    #[case(vec![Cell::from("a")], Field::Lon)]
    #[case(vec![Cell::from("a"), Cell::from(1.0)], Field::Lat)]
    fn tabular_rows_report_missing_fields(#[case] cells: Vec<Cell>, #[case] expected: Field) {
        let err = row(cells)
            .into_point_set(PointRole::Locations)
            .expect_err("short row should fail");
        assert_eq!(
            err,
            InputError::MissingField {
                row: 1,
                field: expected
            }
        );
    }

    #[rstest]
    #[case(vec![Cell::Null, Cell::from(1.0), Cell::from(2.0)], Field::Id)]
    #[case(vec![Cell::from("a"), Cell::from("east"), Cell::from(2.0)], Field::Lon)]
    #[case(vec![Cell::from("a"), Cell::from(1.0), Cell::Null], Field::Lat)]
    fn tabular_rows_report_malformed_fields(#[case] cells: Vec<Cell>, #[case] expected: Field) {
        let err = row(cells)
            .into_point_set(PointRole::Locations)
            .expect_err("malformed row should fail");
        assert!(
            matches!(err, InputError::MalformedField { row: 1, field, .. } if field == expected),
            "unexpected error {err:?}"
        );
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn tabular_rows_deserialise_from_json() {
        let table: TabularPoints =
            serde_json::from_str(r#"[["a", 1.5, 2.5], [12, "3", 4], [null, 0, 0]]"#)
                .expect("rows should deserialise");
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1][0], Cell::Integer(12));
        assert_eq!(table.rows[1][2], Cell::Integer(4));
        assert_eq!(table.rows[2][0], Cell::Null);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn large_numeric_ids_keep_every_digit() {
        let table: TabularPoints = serde_json::from_str("[[9007199254740993, 13, 52.5]]")
            .expect("rows should deserialise");
        let set = table
            .into_point_set(PointRole::Locations)
            .expect("row should normalise");
        assert_eq!(set.ids().next(), Some("9007199254740993"));
        assert_eq!(set.coords().next(), Some(Coord { x: 13.0, y: 52.5 }));
    }

    #[rstest]
    fn geometry_layer_uses_row_names_and_numbers() {
        let layer = GeometryLayer::wgs84(vec![
            GeometryFeature::new(Some("town hall".into()), point!(x: 2.0, y: 48.0)),
            GeometryFeature::new(None, point!(x: 3.0, y: 49.0)),
        ]);
        let set = layer
            .into_point_set(PointRole::Locations)
            .expect("layer should normalise");
        assert_eq!(
            set.into_inner(),
            vec![Point::new("town hall", 2.0, 48.0), Point::new("2", 3.0, 49.0)]
        );
    }

    #[rstest]
    fn geometry_layer_reduces_polygons_to_centroids() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        let layer = GeometryLayer::wgs84(vec![GeometryFeature::new(None, square)]);
        let set = layer
            .into_point_set(PointRole::Locations)
            .expect("polygon should normalise");
        assert_eq!(set.coords().next(), Some(Coord { x: 1.0, y: 1.0 }));
    }

    #[rstest]
    fn geometry_layer_uses_largest_member_of_multipolygons() {
        let small = polygon![(x: 10.0, y: 10.0), (x: 11.0, y: 10.0), (x: 11.0, y: 11.0), (x: 10.0, y: 11.0)];
        let large = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)];
        let collection = GeometryCollection::new_from(vec![
            Geometry::Polygon(small.clone()),
            Geometry::MultiPolygon(MultiPolygon::new(vec![large.clone()])),
        ]);
        let layer = GeometryLayer::wgs84(vec![
            GeometryFeature::new(None, MultiPolygon::new(vec![small, large])),
            GeometryFeature::new(None, Geometry::GeometryCollection(collection)),
        ]);
        let set = layer
            .into_point_set(PointRole::Locations)
            .expect("multipolygons should normalise");
        assert!(set.coords().all(|coord| coord == Coord { x: 2.0, y: 2.0 }));
    }

    #[rstest]
    fn geometry_layer_rejects_lines() {
        let line = LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        let layer = GeometryLayer::wgs84(vec![
            GeometryFeature::new(None, point!(x: 0.0, y: 0.0)),
            GeometryFeature::new(None, line),
        ]);
        let err = layer
            .into_point_set(PointRole::Locations)
            .expect_err("lines are unsupported");
        assert_eq!(
            err,
            InputError::UnsupportedGeometry {
                row: 2,
                kind: "linestring"
            }
        );
    }

    #[rstest]
    #[case(None, InputError::MissingCrs)]
    #[case(Some(3857), InputError::UnsupportedCrs { epsg: 3857 })]
    fn geometry_layer_requires_wgs84(#[case] epsg: Option<u32>, #[case] expected: InputError) {
        let layer = GeometryLayer {
            epsg,
            features: vec![GeometryFeature::new(None, point!(x: 0.0, y: 0.0))],
        };
        let err = layer
            .into_point_set(PointRole::Locations)
            .expect_err("non-WGS 84 layers are rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn empty_layer_is_rejected() {
        let err = GeometryLayer::wgs84(Vec::new())
            .into_point_set(PointRole::Destinations)
            .expect_err("empty layer");
        assert_eq!(
            err,
            InputError::EmptyPointSet {
                role: PointRole::Destinations
            }
        );
    }
}
