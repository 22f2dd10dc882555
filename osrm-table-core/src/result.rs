//! The bundle returned for a successful table request.

use crate::matrix::LabelledMatrix;
use crate::point::Point;

/// Matrices and snapped coordinates for one request.
///
/// Only the matrices present in the server response are populated; a
/// duration-only request never carries `distances`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableResult {
    /// Travel times in minutes.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub durations: Option<LabelledMatrix>,
    /// Travel distances in metres.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub distances: Option<LabelledMatrix>,
    /// Snapped source coordinates, in source order.
    pub sources: Vec<Point>,
    /// Snapped destination coordinates, in destination order.
    pub destinations: Vec<Point>,
}
