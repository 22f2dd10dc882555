//! Table provider trait.

use crate::error::TableError;
use crate::request::TableRequest;
use crate::result::TableResult;

/// Compute origin/destination matrices for a [`TableRequest`].
///
/// Implementations must either return a fully populated [`TableResult`] or an
/// error; partial bundles are never returned. Row labels follow
/// `request.mode().sources()` and column labels follow
/// `request.mode().destinations()`, in order.
///
/// # Examples
///
/// ```rust
/// use osrm_table_core::{
///     LabelledMatrix, Point, TableError, TableProvider, TableRequest, TableResult,
/// };
///
/// struct ZeroProvider;
///
/// impl TableProvider for ZeroProvider {
///     fn table(&self, request: &TableRequest) -> Result<TableResult, TableError> {
///         let sources = request.mode().sources().to_vec();
///         let destinations = request.mode().destinations().to_vec();
///         let ids = |points: &[Point]| points.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
///         let values = vec![vec![Some(0.0); destinations.len()]; sources.len()];
///         let durations = LabelledMatrix::new(ids(&sources), ids(&destinations), values)
///             .map_err(|err| TableError::MalformedResponse { message: err.to_string() })?;
///         Ok(TableResult { durations: Some(durations), distances: None, sources, destinations })
///     }
/// }
///
/// let request = TableRequest::from_inputs(Some(vec![Point::new("a", 0.0, 0.0)].into()), None, None)?;
/// let result = ZeroProvider.table(&request)?;
/// assert_eq!(result.durations.map(|m| m.shape()), Some((1, 1)));
/// # Ok::<(), TableError>(())
/// ```
pub trait TableProvider {
    /// Return the matrices requested by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] when the table cannot be produced, for example
    /// when the request exceeds a server limit or the server rejects it.
    fn table(&self, request: &TableRequest) -> Result<TableResult, TableError>;
}
