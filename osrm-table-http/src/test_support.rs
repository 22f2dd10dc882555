//! Test utilities for the table client.
//!
//! [`ScriptedTransport`] replays a fixed sequence of transport outcomes so
//! retry and validation paths can be exercised without a routing server.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use osrm_table_core::TransportError;
use url::Url;

use crate::osrm::{TableResponse, Waypoint};
use crate::transport::TableTransport;

/// Stub [`TableTransport`] replaying scripted outcomes in order.
///
/// Once the script runs out every further call fails with a network error.
///
/// # Example
///
/// ```
/// use osrm_table_http::test_support::{ScriptedTransport, ok_response};
///
/// let transport = ScriptedTransport::failing_then(2, ok_response(&[(0.0, 0.0)], &[(0.0, 0.0)]));
/// assert_eq!(transport.calls(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: RefCell<VecDeque<Result<TableResponse, TransportError>>>,
    requested: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    /// Replay `outcomes` in order.
    pub fn new(outcomes: impl IntoIterator<Item = Result<TableResponse, TransportError>>) -> Self {
        Self {
            script: RefCell::new(outcomes.into_iter().collect()),
            requested: RefCell::default(),
        }
    }

    /// Fail `failures` times with a network error, then answer `response`.
    #[must_use]
    pub fn failing_then(failures: u32, response: TableResponse) -> Self {
        let outcomes = (1..=failures)
            .map(|attempt| Err(scripted_failure(attempt)))
            .chain(std::iter::once(Ok(response)));
        Self::new(outcomes)
    }

    /// Number of fetches made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requested.borrow().len()
    }

    /// URLs fetched so far, in order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

#[async_trait(?Send)]
impl TableTransport for ScriptedTransport {
    async fn fetch(&self, url: &Url) -> Result<TableResponse, TransportError> {
        self.requested.borrow_mut().push(url.as_str().to_owned());
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(scripted_failure(0)))
    }
}

fn scripted_failure(attempt: u32) -> TransportError {
    TransportError::Network {
        url: "scripted".to_owned(),
        message: format!("scripted failure {attempt}"),
    }
}

/// A successful response echoing `sources` and `destinations` as waypoints
/// with a one-minute duration between every pair.
#[must_use]
pub fn ok_response(sources: &[(f64, f64)], destinations: &[(f64, f64)]) -> TableResponse {
    let waypoints = |coords: &[(f64, f64)]| -> Vec<Waypoint> {
        coords
            .iter()
            .map(|&(lon, lat)| Waypoint::at(lon, lat))
            .collect()
    };
    TableResponse {
        code: Some("Ok".to_owned()),
        durations: Some(vec![vec![Some(60.0); destinations.len()]; sources.len()]),
        sources: Some(waypoints(sources)),
        destinations: Some(waypoints(destinations)),
        ..TableResponse::default()
    }
}
