//! Origin/destination matrices labelled by point identifiers.

use thiserror::Error;

/// Raised when cell rows do not match the supplied labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixShapeError {
    /// Row count differs from the number of row labels.
    #[error("expected {expected} rows, found {actual}")]
    Rows {
        /// Number of row labels.
        expected: usize,
        /// Number of value rows.
        actual: usize,
    },
    /// A row's length differs from the number of column labels.
    #[error("expected {expected} columns in row {row}, found {actual}")]
    Columns {
        /// Zero-based row index.
        row: usize,
        /// Number of column labels.
        expected: usize,
        /// Number of cells in the row.
        actual: usize,
    },
}

/// A matrix of optional values; `None` marks an unreachable pair.
///
/// # Examples
///
/// ```
/// use osrm_table_core::LabelledMatrix;
///
/// let matrix = LabelledMatrix::new(
///     vec!["a".into()],
///     vec!["x".into(), "y".into()],
///     vec![vec![Some(1.5), None]],
/// )?;
/// assert_eq!(matrix.get("a", "x"), Some(Some(1.5)));
/// assert_eq!(matrix.get("a", "y"), Some(None));
/// assert_eq!(matrix.get("b", "x"), None);
/// # Ok::<(), osrm_table_core::MatrixShapeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LabelledMatrix {
    rows: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl LabelledMatrix {
    /// Build a matrix, checking that `values` is `rows × columns`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixShapeError`] describing the first mismatch.
    pub fn new(
        rows: Vec<String>,
        columns: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, MatrixShapeError> {
        if values.len() != rows.len() {
            return Err(MatrixShapeError::Rows {
                expected: rows.len(),
                actual: values.len(),
            });
        }
        if let Some((row, cells)) = values
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(MatrixShapeError::Columns {
                row,
                expected: columns.len(),
                actual: cells.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// Row labels (source ids).
    #[must_use]
    pub fn row_ids(&self) -> &[String] {
        &self.rows
    }

    /// Column labels (destination ids).
    #[must_use]
    pub fn column_ids(&self) -> &[String] {
        &self.columns
    }

    /// Cell values, row-major.
    #[must_use]
    pub fn values(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    /// `(rows, columns)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Look up a cell by labels, using the first occurrence of each label.
    ///
    /// The outer `Option` is `None` when either label is unknown; the inner
    /// one is `None` for unreachable pairs.
    #[must_use]
    pub fn get(&self, row_id: &str, column_id: &str) -> Option<Option<f64>> {
        let row = self.rows.iter().position(|id| id == row_id)?;
        let column = self.columns.iter().position(|id| id == column_id)?;
        self.values.get(row)?.get(column).copied()
    }

    /// Transform every present value, keeping labels and gaps.
    #[must_use]
    pub fn map_values(self, mut f: impl FnMut(f64) -> f64) -> Self {
        let values = self
            .values
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.map(&mut f)).collect())
            .collect();
        Self { values, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn ids(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|label| (*label).to_owned()).collect()
    }

    #[fixture]
    fn matrix() -> LabelledMatrix {
        LabelledMatrix::new(
            ids(&["a", "b"]),
            ids(&["x", "y", "z"]),
            vec![
                vec![Some(1.0), Some(2.0), None],
                vec![Some(4.0), Some(5.0), Some(6.0)],
            ],
        )
        .expect("shape should match")
    }

    #[rstest]
    fn lookup_uses_labels(matrix: LabelledMatrix) {
        assert_eq!(matrix.shape(), (2, 3));
        assert_eq!(matrix.get("b", "y"), Some(Some(5.0)));
        assert_eq!(matrix.get("a", "z"), Some(None));
        assert_eq!(matrix.get("a", "missing"), None);
    }

    #[rstest]
    fn map_values_preserves_gaps(matrix: LabelledMatrix) {
        let doubled = matrix.map_values(|value| value * 2.0);
        assert_eq!(doubled.values()[0], vec![Some(2.0), Some(4.0), None]);
        assert_eq!(doubled.row_ids(), ids(&["a", "b"]).as_slice());
    }

    #[rstest]
    fn rejects_wrong_row_count() {
        let err = LabelledMatrix::new(ids(&["a", "b"]), ids(&["x"]), vec![vec![Some(1.0)]])
            .expect_err("one row is missing");
        assert_eq!(
            err,
            MatrixShapeError::Rows {
                expected: 2,
                actual: 1
            }
        );
    }

    #[rstest]
    fn rejects_ragged_rows() {
        let err = LabelledMatrix::new(
            ids(&["a", "b"]),
            ids(&["x", "y"]),
            vec![vec![Some(1.0), Some(2.0)], vec![Some(3.0)]],
        )
        .expect_err("second row is short");
        assert_eq!(
            err,
            MatrixShapeError::Columns {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }
}
