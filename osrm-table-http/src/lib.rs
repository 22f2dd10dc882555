//! HTTP client for the OSRM Table service.
//!
//! [`OsrmTableClient`] implements [`osrm_table_core::TableProvider`] against a
//! live routing server. Each request passes through four stages:
//!
//! 1. [`TableQuery::build`] encodes the points and options as a `GET` URL.
//! 2. [`check_limits`] rejects matrices or URLs the server would refuse.
//! 3. [`RetryPolicy`] re-sends the request on transport failures.
//! 4. The decoded body is validated and relabelled with the caller's ids.
//!
//! The public demo at `router.project-osrm.org` is detected from the base URL
//! and gets stricter treatment; see [`ServerConfig`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use osrm_table_core::{Point, TableProvider, TableRequest};
//! use osrm_table_http::{OsrmTableClient, OsrmTableConfig, RetryPolicy};
//!
//! let config = OsrmTableConfig::new("https://router.project-osrm.org")
//!     .with_retry(RetryPolicy::new(3, Duration::from_millis(500)));
//! let client = OsrmTableClient::with_config(config)?;
//!
//! let request = TableRequest::from_inputs(
//!     None,
//!     Some(vec![Point::new("home", -0.1, 51.5)].into()),
//!     Some(vec![Point::new("work", -0.2, 51.6)].into()),
//! )?;
//! let result = client.table(&request)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod client;
mod guard;
mod osrm;
mod query;
mod response;
mod retry;
mod server;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use client::{ClientBuildError, DEFAULT_USER_AGENT, OsrmTableClient, OsrmTableConfig};
pub use guard::check_limits;
pub use osrm::{TableResponse, Waypoint};
pub use query::{COORDINATE_PRECISION, TableQuery};
pub use retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryOutcome, RetryPolicy};
pub use server::{
    DEFAULT_BASE_URL, DEFAULT_MAX_URL_LENGTH, DEFAULT_PROFILE, PUBLIC_DEMO_MAX_CELLS,
    PUBLIC_DEMO_URL, RequestLimits, ServerConfig,
};
pub use transport::{HttpTransport, TableTransport};
