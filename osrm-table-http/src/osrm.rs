//! OSRM API response types for the Table service.
//!
//! These types mirror the JSON body the server returns. Every field is
//! optional so that error bodies and partial answers still decode; the
//! response validator decides what a usable answer looks like.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service>

use serde::Deserialize;

/// OSRM Table API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"InvalidOptions"` - Invalid option combination
    /// - `"NoTable"` - Table computation failed
    ///
    /// Proxies and misconfigured servers sometimes answer without one.
    #[serde(default)]
    pub code: Option<String>,

    /// Optional error message when `code` is not `"Ok"`.
    #[serde(default)]
    pub message: Option<String>,

    /// Matrix of durations in seconds; `null` cells mark unroutable pairs.
    #[serde(default)]
    pub durations: Option<Vec<Vec<Option<f64>>>>,

    /// Matrix of distances in metres; `null` cells mark unroutable pairs.
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f64>>>>,

    /// Snapped source waypoints, in row order.
    #[serde(default)]
    pub sources: Option<Vec<Waypoint>>,

    /// Snapped destination waypoints, in column order.
    #[serde(default)]
    pub destinations: Option<Vec<Waypoint>>,
}

impl TableResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code.as_deref() == Some("Ok")
    }
}

/// A request coordinate snapped to the road network.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Waypoint {
    /// Snapped `[longitude, latitude]`.
    pub location: [f64; 2],
    /// Name of the street the coordinate snapped to.
    #[serde(default)]
    pub name: Option<String>,
    /// Distance in metres from the input coordinate to the snapped one.
    #[serde(default)]
    pub distance: Option<f64>,
}

impl Waypoint {
    /// Waypoint at `[lon, lat]` with no street metadata.
    #[must_use]
    pub const fn at(lon: f64, lat: f64) -> Self {
        Self {
            location: [lon, lat],
            name: None,
            distance: None,
        }
    }
}
