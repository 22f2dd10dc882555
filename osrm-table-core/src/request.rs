//! Validated table requests.
//!
//! A [`TableRequest`] pairs a [`TableMode`] with the options that shape the
//! outgoing query. It is built once and never mutated by the client.

use crate::input::{InputError, Locations};
use crate::measure::Measure;
use crate::point::{PointRole, PointSet};

/// How coordinates are serialised in the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateEncoding {
    /// Semicolon-separated `lon,lat` pairs.
    #[default]
    Plain,
    /// A single `polyline(...)` segment using Google polyline encoding.
    Polyline,
}

/// Which matrix the server should compute.
#[derive(Debug, Clone, PartialEq)]
pub enum TableMode {
    /// Full matrix among one point set.
    AllPairs(PointSet),
    /// Matrix from every source to every destination.
    Bipartite {
        /// Matrix rows.
        sources: PointSet,
        /// Matrix columns.
        destinations: PointSet,
    },
}

impl TableMode {
    /// Points labelling the matrix rows.
    #[must_use]
    pub const fn sources(&self) -> &PointSet {
        match self {
            Self::AllPairs(points) => points,
            Self::Bipartite { sources, .. } => sources,
        }
    }

    /// Points labelling the matrix columns.
    #[must_use]
    pub const fn destinations(&self) -> &PointSet {
        match self {
            Self::AllPairs(points) => points,
            Self::Bipartite { destinations, .. } => destinations,
        }
    }

    /// Number of matrix cells the server will compute.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.sources()
            .len()
            .saturating_mul(self.destinations().len())
    }
}

/// A complete, immutable table request.
///
/// # Examples
///
/// ```
/// use osrm_table_core::{Measure, Point, TableRequest};
///
/// let request = TableRequest::from_inputs(
///     Some(vec![Point::new("a", 2.35, 48.85), Point::new("b", 2.29, 48.86)].into()),
///     None,
///     None,
/// )?
/// .with_measures([Measure::Duration, Measure::Distance]);
///
/// assert_eq!(request.mode().cell_count(), 4);
/// # Ok::<(), osrm_table_core::InputError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableRequest {
    mode: TableMode,
    measures: Vec<Measure>,
    exclude: Option<String>,
    encoding: CoordinateEncoding,
}

impl TableRequest {
    /// Request the full matrix among `locations`.
    #[must_use]
    pub fn all_pairs(locations: PointSet) -> Self {
        Self::with_mode(TableMode::AllPairs(locations))
    }

    /// Request the matrix from `sources` to `destinations`.
    #[must_use]
    pub fn bipartite(sources: PointSet, destinations: PointSet) -> Self {
        Self::with_mode(TableMode::Bipartite {
            sources,
            destinations,
        })
    }

    fn with_mode(mode: TableMode) -> Self {
        Self {
            mode,
            measures: vec![Measure::Duration],
            exclude: None,
            encoding: CoordinateEncoding::Plain,
        }
    }

    /// Resolve the request mode from optional inputs.
    ///
    /// `locations` alone, or `sources` without `destinations`, selects
    /// all-pairs mode. `sources` with `destinations` selects bipartite mode.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NoLocations`], [`InputError::MissingSources`] or
    /// [`InputError::ConflictingInputs`] for unusable combinations, and the
    /// normaliser's error for malformed inputs.
    pub fn from_inputs(
        locations: Option<Locations>,
        sources: Option<Locations>,
        destinations: Option<Locations>,
    ) -> Result<Self, InputError> {
        match (locations, sources, destinations) {
            (Some(all), None, None) => {
                Ok(Self::all_pairs(all.into_point_set(PointRole::Locations)?))
            }
            (None, Some(origins), None) => {
                Ok(Self::all_pairs(origins.into_point_set(PointRole::Sources)?))
            }
            (None, Some(origins), Some(targets)) => Ok(Self::bipartite(
                origins.into_point_set(PointRole::Sources)?,
                targets.into_point_set(PointRole::Destinations)?,
            )),
            (None, None, Some(_)) => Err(InputError::MissingSources),
            (Some(_), _, _) => Err(InputError::ConflictingInputs),
            (None, None, None) => Err(InputError::NoLocations),
        }
    }

    /// Replace the requested measures.
    ///
    /// Duplicates are dropped; an empty list falls back to duration only.
    #[must_use]
    pub fn with_measures(mut self, measures: impl IntoIterator<Item = Measure>) -> Self {
        let mut unique = Vec::new();
        for measure in measures {
            if !unique.contains(&measure) {
                unique.push(measure);
            }
        }
        if unique.is_empty() {
            unique.push(Measure::Duration);
        }
        self.measures = unique;
        self
    }

    /// Exclude road classes, e.g. `"motorway"` or `"toll,ferry"`.
    #[must_use]
    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    /// Select the coordinate encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: CoordinateEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The resolved mode.
    #[must_use]
    pub const fn mode(&self) -> &TableMode {
        &self.mode
    }

    /// Requested measures, in request order.
    #[must_use]
    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Exclusion classes, if any.
    #[must_use]
    pub fn exclude(&self) -> Option<&str> {
        self.exclude.as_deref()
    }

    /// Coordinate encoding.
    #[must_use]
    pub const fn encoding(&self) -> CoordinateEncoding {
        self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use rstest::{fixture, rstest};

    #[fixture]
    fn pair() -> Locations {
        vec![Point::new("a", 1.0, 2.0), Point::new("b", 3.0, 4.0)].into()
    }

    #[fixture]
    fn triple() -> Locations {
        vec![
            Point::new("x", 5.0, 6.0),
            Point::new("y", 7.0, 8.0),
            Point::new("z", 9.0, 10.0),
        ]
        .into()
    }

    #[rstest]
    fn locations_alone_select_all_pairs(pair: Locations) {
        let request = TableRequest::from_inputs(Some(pair), None, None).expect("all pairs");
        assert!(matches!(request.mode(), TableMode::AllPairs(set) if set.len() == 2));
        assert_eq!(request.mode().cell_count(), 4);
        assert_eq!(request.measures(), &[Measure::Duration]);
    }

    #[rstest]
    fn sources_without_destinations_select_all_pairs(pair: Locations) {
        let request = TableRequest::from_inputs(None, Some(pair), None).expect("all pairs");
        assert_eq!(request.mode().sources(), request.mode().destinations());
    }

    #[rstest]
    fn sources_and_destinations_select_bipartite(pair: Locations, triple: Locations) {
        let request = TableRequest::from_inputs(None, Some(pair), Some(triple)).expect("bipartite");
        assert_eq!(request.mode().sources().len(), 2);
        assert_eq!(request.mode().destinations().len(), 3);
        assert_eq!(request.mode().cell_count(), 6);
    }

    #[rstest]
    fn destinations_need_sources(triple: Locations) {
        let err = TableRequest::from_inputs(None, None, Some(triple)).expect_err("no sources");
        assert_eq!(err, InputError::MissingSources);
    }

    #[rstest]
    fn locations_conflict_with_explicit_sets(pair: Locations, triple: Locations) {
        let err = TableRequest::from_inputs(Some(pair), Some(triple), None).expect_err("ambiguous");
        assert_eq!(err, InputError::ConflictingInputs);
    }

    #[rstest]
    fn nothing_is_rejected() {
        let err = TableRequest::from_inputs(None, None, None).expect_err("no input");
        assert_eq!(err, InputError::NoLocations);
    }

    #[rstest]
    #[case(vec![], vec![Measure::Duration])]
    #[case(vec![Measure::Distance, Measure::Distance], vec![Measure::Distance])]
    #[case(
        vec![Measure::Distance, Measure::Duration],
        vec![Measure::Distance, Measure::Duration]
    )]
    fn measures_are_deduplicated(
        pair: Locations,
        #[case] requested: Vec<Measure>,
        #[case] expected: Vec<Measure>,
    ) {
        let request = TableRequest::from_inputs(Some(pair), None, None)
            .expect("all pairs")
            .with_measures(requested);
        assert_eq!(request.measures(), expected.as_slice());
    }
}
