//! Pre-flight size checks.

use osrm_table_core::TableError;

use crate::query::TableQuery;
use crate::server::RequestLimits;

/// Reject `query` if it exceeds `limits`.
///
/// The cell ceiling is checked before the URL length so that an oversized
/// matrix reports the more actionable error.
///
/// # Errors
///
/// Returns [`TableError::TooManyCells`] or [`TableError::RequestTooLong`].
pub fn check_limits(limits: RequestLimits, query: &TableQuery) -> Result<(), TableError> {
    if let Some(max) = limits.max_cells.filter(|max| query.cell_count() > *max) {
        return Err(TableError::TooManyCells {
            cells: query.cell_count(),
            max,
        });
    }
    if query.len() > limits.max_url_length {
        return Err(TableError::RequestTooLong {
            length: query.len(),
            max: limits.max_url_length,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerConfig;
    use osrm_table_core::{Point, PointRole, PointSet, TableRequest};
    use rstest::rstest;

    fn grid(count: usize, role: PointRole) -> PointSet {
        let points = (0..count)
            .map(|index| Point::new(index.to_string(), 13.38886, 52.51703))
            .collect();
        PointSet::new(points, role).expect("non-empty point set")
    }

    fn query(sources: usize, destinations: usize, server: &ServerConfig) -> TableQuery {
        let request = TableRequest::bipartite(
            grid(sources, PointRole::Sources),
            grid(destinations, PointRole::Destinations),
        );
        TableQuery::build(server, &request).expect("query builds")
    }

    #[rstest]
    #[case(100, 100, true)]
    #[case(100, 101, false)]
    fn public_demo_caps_cells(
        #[case] sources: usize,
        #[case] destinations: usize,
        #[case] accepted: bool,
    ) {
        let server = ServerConfig::public_demo().with_limits(RequestLimits {
            max_url_length: usize::MAX,
            ..RequestLimits::public_demo()
        });

        let outcome = check_limits(server.limits(), &query(sources, destinations, &server));

        if accepted {
            assert_eq!(outcome, Ok(()));
        } else {
            assert_eq!(
                outcome,
                Err(TableError::TooManyCells {
                    cells: 10_100,
                    max: 10_000
                })
            );
        }
    }

    #[rstest]
    fn self_hosted_has_no_cell_cap() {
        let server = ServerConfig::default().with_limits(RequestLimits {
            max_url_length: usize::MAX,
            ..RequestLimits::self_hosted()
        });

        let outcome = check_limits(server.limits(), &query(1, 20_000, &server));

        assert_eq!(outcome, Ok(()));
    }

    #[rstest]
    fn long_urls_are_rejected() {
        let server = ServerConfig::default();
        let long = query(1, 600, &server);

        let err = check_limits(server.limits(), &long).expect_err("URL too long");

        assert_eq!(
            err,
            TableError::RequestTooLong {
                length: long.len(),
                max: 8_000
            }
        );
    }
}
