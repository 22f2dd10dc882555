//! Validating and reshaping decoded table responses.

use osrm_table_core::{LabelledMatrix, Point, PointSet, TableError, TableMode, TableResult};

use crate::osrm::{TableResponse, Waypoint};

/// A response whose `code` is `"Ok"`.
#[derive(Debug)]
pub(crate) struct ValidatedResponse(TableResponse);

/// Accept only responses reporting success.
///
/// A body without a `code` is malformed; its `message`, if any, is kept.
pub(crate) fn validate(response: TableResponse) -> Result<ValidatedResponse, TableError> {
    if response.is_ok() {
        return Ok(ValidatedResponse(response));
    }
    match response.code {
        Some(code) => Err(TableError::Service {
            code,
            message: response.message.unwrap_or_default(),
        }),
        None => Err(TableError::MalformedResponse {
            message: response
                .message
                .unwrap_or_else(|| "response has no status code".to_owned()),
        }),
    }
}

/// Label the matrices and snapped waypoints with the request's point ids.
///
/// Durations are converted from seconds to minutes. Cells that are absent,
/// negative or not finite become `None`.
pub(crate) fn reshape(
    response: ValidatedResponse,
    mode: &TableMode,
) -> Result<TableResult, TableError> {
    let ValidatedResponse(body) = response;
    let sources = mode.sources();
    let destinations = mode.destinations();

    let durations = body
        .durations
        .map(|cells| label(cells, sources, destinations, "durations"))
        .transpose()?
        .map(|matrix| matrix.map_values(seconds_to_minutes));
    let distances = body
        .distances
        .map(|cells| label(cells, sources, destinations, "distances"))
        .transpose()?;

    Ok(TableResult {
        durations,
        distances,
        sources: snap(body.sources, sources, "sources")?,
        destinations: snap(body.destinations, destinations, "destinations")?,
    })
}

fn label(
    cells: Vec<Vec<Option<f64>>>,
    sources: &PointSet,
    destinations: &PointSet,
    field: &str,
) -> Result<LabelledMatrix, TableError> {
    let values = cells
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.filter(|value| value.is_finite() && *value >= 0.0))
                .collect()
        })
        .collect();
    LabelledMatrix::new(ids(sources), ids(destinations), values).map_err(|err| {
        TableError::MalformedResponse {
            message: format!("{field}: {err}"),
        }
    })
}

fn snap(
    echoed: Option<Vec<Waypoint>>,
    points: &PointSet,
    field: &str,
) -> Result<Vec<Point>, TableError> {
    let waypoints = echoed.ok_or_else(|| TableError::MalformedResponse {
        message: format!("response has no {field} waypoints"),
    })?;
    if waypoints.len() != points.len() {
        return Err(TableError::MalformedResponse {
            message: format!(
                "expected {} {field} waypoints, found {}",
                points.len(),
                waypoints.len()
            ),
        });
    }
    Ok(points
        .iter()
        .zip(waypoints)
        .map(|(point, waypoint)| {
            let [lon, lat] = waypoint.location;
            Point::new(point.id.clone(), lon, lat)
        })
        .collect())
}

fn ids(points: &PointSet) -> Vec<String> {
    points.ids().map(str::to_owned).collect()
}

#[expect(clippy::float_arithmetic, reason = "seconds to minutes")]
fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use osrm_table_core::PointRole;
    use rstest::{fixture, rstest};

    #[fixture]
    fn bipartite() -> TableMode {
        let sources = PointSet::new(
            vec![Point::new("depot", -0.1, 51.5)],
            PointRole::Sources,
        )
        .expect("non-empty point set");
        let destinations = PointSet::new(
            vec![Point::new("x", -0.2, 51.6), Point::new("y", -0.3, 51.7)],
            PointRole::Destinations,
        )
        .expect("non-empty point set");
        TableMode::Bipartite {
            sources,
            destinations,
        }
    }

    fn ok_response() -> TableResponse {
        TableResponse {
            code: Some("Ok".to_owned()),
            durations: Some(vec![vec![Some(90.0), None]]),
            sources: Some(vec![Waypoint::at(-0.1001, 51.5001)]),
            destinations: Some(vec![
                Waypoint::at(-0.2001, 51.6001),
                Waypoint::at(-0.3001, 51.7001),
            ]),
            ..TableResponse::default()
        }
    }

    #[rstest]
    fn service_errors_carry_code_and_message() {
        let response = TableResponse {
            code: Some("InvalidQuery".to_owned()),
            message: Some("Too many coordinates".to_owned()),
            ..TableResponse::default()
        };

        let err = validate(response).expect_err("service rejected the request");

        assert_eq!(
            err,
            TableError::Service {
                code: "InvalidQuery".to_owned(),
                message: "Too many coordinates".to_owned(),
            }
        );
    }

    #[rstest]
    #[case(Some("upstream unavailable"), "upstream unavailable")]
    #[case(None, "response has no status code")]
    fn missing_code_is_malformed(#[case] message: Option<&str>, #[case] expected: &str) {
        let response = TableResponse {
            message: message.map(str::to_owned),
            ..TableResponse::default()
        };

        let err = validate(response).expect_err("no status code");

        assert_eq!(
            err,
            TableError::MalformedResponse {
                message: expected.to_owned()
            }
        );
    }

    #[rstest]
    fn durations_become_labelled_minutes(bipartite: TableMode) {
        let validated = validate(ok_response()).expect("status is Ok");

        let result = reshape(validated, &bipartite).expect("shapes match");

        let durations = result.durations.expect("durations present");
        assert_eq!(durations.row_ids(), ["depot"]);
        assert_eq!(durations.column_ids(), ["x", "y"]);
        assert_eq!(durations.get("depot", "x"), Some(Some(1.5)));
        assert_eq!(durations.get("depot", "y"), Some(None));
        assert!(result.distances.is_none());
    }

    #[rstest]
    fn waypoints_keep_ids_and_snapped_locations(bipartite: TableMode) {
        let validated = validate(ok_response()).expect("status is Ok");

        let result = reshape(validated, &bipartite).expect("shapes match");

        assert_eq!(result.sources, vec![Point::new("depot", -0.1001, 51.5001)]);
        assert_eq!(result.destinations[1], Point::new("y", -0.3001, 51.7001));
    }

    #[rstest]
    fn invalid_cells_become_gaps(bipartite: TableMode) {
        let response = TableResponse {
            durations: None,
            distances: Some(vec![vec![Some(-1.0), Some(f64::NAN)]]),
            ..ok_response()
        };
        let validated = validate(response).expect("status is Ok");

        let result = reshape(validated, &bipartite).expect("shapes match");

        let distances = result.distances.expect("distances present");
        assert_eq!(distances.values(), [vec![None, None]]);
        assert!(result.durations.is_none());
    }

    #[rstest]
    fn matrix_shape_mismatch_is_malformed(bipartite: TableMode) {
        let response = TableResponse {
            durations: Some(vec![vec![Some(1.0)]]),
            ..ok_response()
        };
        let validated = validate(response).expect("status is Ok");

        let err = reshape(validated, &bipartite).expect_err("one column missing");

        assert!(
            matches!(err, TableError::MalformedResponse { ref message } if message.starts_with("durations"))
        );
    }

    #[rstest]
    fn missing_waypoints_are_malformed(bipartite: TableMode) {
        let response = TableResponse {
            destinations: None,
            ..ok_response()
        };
        let validated = validate(response).expect("status is Ok");

        let err = reshape(validated, &bipartite).expect_err("no destinations");

        assert_eq!(
            err,
            TableError::MalformedResponse {
                message: "response has no destinations waypoints".to_owned()
            }
        );
    }
}
