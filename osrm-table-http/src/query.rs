//! Table request URL construction.
//!
//! A [`TableQuery`] is the fully encoded `GET` URL for one request:
//!
//! ```text
//! {base}/table/v1/{profile}/{coordinates}[?sources=..&destinations=..][&exclude=..][&annotations=..]
//! ```
//!
//! Coordinates are either `lon,lat` pairs joined by `;` or a single
//! `polyline(...)` segment. Bipartite requests send sources first and
//! destinations second, then point the server at each half by index.

use std::ops::Range;

use geo::Coord;
use osrm_table_core::{CoordinateEncoding, TableError, TableMode, TableRequest};
use url::Url;

use crate::server::ServerConfig;

/// Decimal places used for plain coordinates and polyline encoding.
pub const COORDINATE_PRECISION: u32 = 5;

/// An encoded table request.
///
/// # Examples
///
/// ```
/// use osrm_table_core::{Point, TableRequest};
/// use osrm_table_http::{ServerConfig, TableQuery};
///
/// let request = TableRequest::from_inputs(
///     None,
///     Some(vec![Point::new("a", 13.4, 52.5)].into()),
///     Some(vec![Point::new("b", 13.5, 52.6), Point::new("c", 13.6, 52.7)].into()),
/// )?;
/// let query = TableQuery::build(&ServerConfig::public_demo(), &request)?;
/// assert_eq!(
///     query.as_str(),
///     "https://router.project-osrm.org/table/v1/driving/\
///      13.40000,52.50000;13.50000,52.60000;13.60000,52.70000\
///      ?sources=0&destinations=1;2",
/// );
/// assert_eq!(query.cell_count(), 2);
/// # Ok::<(), osrm_table_core::TableError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    url: Url,
    params: Vec<(&'static str, String)>,
    cell_count: usize,
}

impl TableQuery {
    /// Encode `request` for `server`.
    ///
    /// # Errors
    ///
    /// - [`TableError::UnsupportedOption`] when polyline encoding is requested
    ///   from the public demo.
    /// - [`TableError::InvalidExclude`] when the exclude list holds anything
    ///   but comma-separated class names.
    /// - [`TableError::CoordinateEncoding`] when a coordinate cannot be
    ///   polyline-encoded.
    /// - [`TableError::InvalidUrl`] when the base URL cannot carry a path.
    pub fn build(server: &ServerConfig, request: &TableRequest) -> Result<Self, TableError> {
        if request.encoding() == CoordinateEncoding::Polyline && server.is_public_demo() {
            return Err(TableError::UnsupportedOption {
                option: "polyline coordinate encoding",
                server: server.base_url().to_owned(),
            });
        }

        if let Some(exclude) = request.exclude() {
            check_exclude(exclude)?;
        }

        let coordinates = encode_coordinates(request.mode(), request.encoding())?;
        let params = query_params(server, request);

        let mut url = Url::parse(server.base_url()).map_err(|err| TableError::InvalidUrl {
            url: server.base_url().to_owned(),
            message: err.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|()| TableError::InvalidUrl {
                url: server.base_url().to_owned(),
                message: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(["table", "v1", server.profile(), coordinates.as_str()]);
        url.set_query(join_params(&params).as_deref());

        Ok(Self {
            url,
            params,
            cell_count: request.mode().cell_count(),
        })
    }

    /// The encoded request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// The encoded request URL as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Length of the encoded URL in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.url.as_str().len()
    }

    /// Always `false`; an encoded URL carries at least a scheme.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.url.as_str().is_empty()
    }

    /// Query parameters in emission order.
    #[must_use]
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Value of the first query parameter named `key`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Number of matrix cells the server will compute.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cell_count
    }
}

fn ordered_coords(mode: &TableMode) -> Vec<Coord> {
    match mode {
        TableMode::AllPairs(points) => points.coords().collect(),
        TableMode::Bipartite {
            sources,
            destinations,
        } => sources.coords().chain(destinations.coords()).collect(),
    }
}

fn encode_coordinates(
    mode: &TableMode,
    encoding: CoordinateEncoding,
) -> Result<String, TableError> {
    let coords = ordered_coords(mode);
    match encoding {
        CoordinateEncoding::Plain => Ok(plain_coordinates(&coords)),
        CoordinateEncoding::Polyline => {
            polyline::encode_coordinates(coords, COORDINATE_PRECISION)
                .map(|encoded| format!("polyline({encoded})"))
                .map_err(|err| TableError::CoordinateEncoding {
                    message: err.to_string(),
                })
        }
    }
}

fn plain_coordinates(coords: &[Coord]) -> String {
    coords
        .iter()
        .map(|coord| format!("{:.5},{:.5}", coord.x, coord.y))
        .collect::<Vec<_>>()
        .join(";")
}

/// Exclude values are sent verbatim, so anything beyond class names and
/// commas could smuggle extra parameters into the query.
fn check_exclude(exclude: &str) -> Result<(), TableError> {
    let valid = exclude
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == ',');
    if valid {
        Ok(())
    } else {
        Err(TableError::InvalidExclude {
            value: exclude.to_owned(),
        })
    }
}

fn query_params(server: &ServerConfig, request: &TableRequest) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let TableMode::Bipartite {
        sources,
        destinations,
    } = request.mode()
    {
        let split = sources.len();
        params.push(("sources", index_list(0..split)));
        params.push((
            "destinations",
            index_list(split..split.saturating_add(destinations.len())),
        ));
    }
    if let Some(exclude) = request.exclude() {
        params.push(("exclude", exclude.to_owned()));
    }
    // The public demo rejects `annotations` and only ever answers durations.
    if !server.is_public_demo() {
        let annotations = request
            .measures()
            .iter()
            .map(|measure| measure.as_str())
            .collect::<Vec<_>>()
            .join(",");
        params.push(("annotations", annotations));
    }
    params
}

fn index_list(indices: Range<usize>) -> String {
    indices
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

fn join_params(params: &[(&'static str, String)]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    Some(
        params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&"),
    )
}
