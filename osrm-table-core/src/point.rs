//! Labelled geographic points and the ordered sets sent to the table service.

use std::fmt;
use std::ops::Deref;

use geo::Coord;

use crate::input::InputError;

/// A single labelled location expressed in WGS 84 degrees.
///
/// The identifier is only ever used as a row or column label; it is never
/// checked for uniqueness.
///
/// # Examples
///
/// ```
/// use osrm_table_core::Point;
///
/// let point = Point::new("depot", 13.388, 52.517);
/// assert_eq!(point.id, "depot");
/// assert_eq!(point.coord().x, 13.388);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Caller-supplied label.
    pub id: String,
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Point {
    /// Construct a point from its label and coordinates.
    pub fn new(id: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            lon,
            lat,
        }
    }

    /// Return the location as a `geo` coordinate (`x` = lon, `y` = lat).
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

/// Which side of the matrix a point set feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRole {
    /// The single set used for all-pairs requests.
    Locations,
    /// Matrix rows.
    Sources,
    /// Matrix columns.
    Destinations,
}

impl fmt::Display for PointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Locations => "locations",
            Self::Sources => "sources",
            Self::Destinations => "destinations",
        };
        f.write_str(name)
    }
}

/// Ordered, non-empty sequence of points.
///
/// Order is significant: it fixes the index correspondence with the flattened
/// coordinate list sent to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet(Vec<Point>);

impl PointSet {
    /// Wrap `points`, rejecting an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyPointSet`] when `points` is empty.
    pub fn new(points: Vec<Point>, role: PointRole) -> Result<Self, InputError> {
        if points.is_empty() {
            return Err(InputError::EmptyPointSet { role });
        }
        Ok(Self(points))
    }

    /// Identifiers in set order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|point| point.id.as_str())
    }

    /// Coordinates in set order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.0.iter().map(Point::coord)
    }

    /// Consume the wrapper and return the points.
    #[must_use]
    pub fn into_inner(self) -> Vec<Point> {
        self.0
    }
}

impl Deref for PointSet {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
