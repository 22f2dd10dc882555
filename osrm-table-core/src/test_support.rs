//! Deterministic `TableProvider` doubles used by unit and behaviour tests.

use crate::{LabelledMatrix, Point, TableError, TableProvider, TableRequest, TableResult};

/// Provider answering every request with one unit between distinct ids and
/// zero between matching ids.
///
/// Snapped coordinates echo the input unchanged.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitTableProvider;

impl TableProvider for UnitTableProvider {
    fn table(&self, request: &TableRequest) -> Result<TableResult, TableError> {
        let sources = request.mode().sources().to_vec();
        let destinations = request.mode().destinations().to_vec();
        let values = sources
            .iter()
            .map(|from| {
                destinations
                    .iter()
                    .map(|to| Some(if from.id == to.id { 0.0 } else { 1.0 }))
                    .collect()
            })
            .collect();
        let matrix = LabelledMatrix::new(ids(&sources), ids(&destinations), values).map_err(
            |err| TableError::MalformedResponse {
                message: err.to_string(),
            },
        )?;
        let mut result = TableResult {
            durations: None,
            distances: None,
            sources,
            destinations,
        };
        for measure in request.measures() {
            match measure {
                crate::Measure::Duration => result.durations = Some(matrix.clone()),
                crate::Measure::Distance => result.distances = Some(matrix.clone()),
            }
        }
        Ok(result)
    }
}

/// Provider returning a fixed error for every request.
#[derive(Debug, Clone)]
pub struct FailingTableProvider {
    error: TableError,
}

impl FailingTableProvider {
    /// Create a provider that always fails with `error`.
    #[must_use]
    pub const fn new(error: TableError) -> Self {
        Self { error }
    }
}

impl TableProvider for FailingTableProvider {
    fn table(&self, _request: &TableRequest) -> Result<TableResult, TableError> {
        Err(self.error.clone())
    }
}

fn ids(points: &[Point]) -> Vec<String> {
    points.iter().map(|point| point.id.clone()).collect()
}
