//! HTTP-based `TableProvider` for the OSRM Table API.
//!
//! [`OsrmTableClient`] encodes a [`TableRequest`], checks it against the
//! server's limits, fetches it with fixed-delay retries and turns the answer
//! into a labelled [`TableResult`].
//!
//! # Architecture
//!
//! The [`TableProvider`] trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This client bridges the async HTTP
//! calls to the sync interface by blocking on a Tokio runtime internally;
//! async callers use [`OsrmTableClient::table_async`] directly.

use std::fmt;
use std::time::Duration;

use log::{debug, error};
use osrm_table_core::{TableError, TableProvider, TableRequest, TableResult};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use crate::guard::check_limits;
use crate::query::TableQuery;
use crate::response::{reshape, validate};
use crate::retry::{RetryOutcome, RetryPolicy};
use crate::server::{RequestLimits, ServerConfig};
use crate::transport::{HttpTransport, TableTransport};

/// Error type for [`OsrmTableClient`] construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = concat!("osrm-table/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`OsrmTableClient`].
#[derive(Debug, Clone)]
pub struct OsrmTableConfig {
    /// Server to query.
    pub server: ServerConfig,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Retry budget for transport failures.
    pub retry: RetryPolicy,
}

impl Default for OsrmTableConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

impl OsrmTableConfig {
    /// Create a configuration for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::new(base_url),
            ..Default::default()
        }
    }

    /// Set the routing profile, e.g. `"foot"`.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.server = self.server.with_profile(profile);
        self
    }

    /// Override the pre-flight limits.
    #[must_use]
    pub fn with_limits(mut self, limits: RequestLimits) -> Self {
        self.server = self.server.with_limits(limits);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// OSRM table client.
///
/// The client holds no per-request state, so one instance can serve many
/// requests in sequence. It owns a Tokio runtime that is reused across
/// synchronous calls.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, [`TableProvider::table`] uses
/// the client's own runtime. When called from within a multi-threaded Tokio
/// runtime, it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics. From a
/// `current_thread` runtime it falls back to its own runtime, which blocks
/// the caller's; prefer [`OsrmTableClient::table_async`] there.
///
/// # Examples
///
/// ```no_run
/// use osrm_table_core::{Measure, Point, TableProvider, TableRequest};
/// use osrm_table_http::{OsrmTableClient, OsrmTableConfig};
///
/// let client = OsrmTableClient::with_config(
///     OsrmTableConfig::new("http://localhost:5000").with_profile("foot"),
/// )?;
/// let request = TableRequest::from_inputs(
///     Some(vec![Point::new("a", 13.388, 52.517), Point::new("b", 13.397, 52.529)].into()),
///     None,
///     None,
/// )?
/// .with_measures([Measure::Duration, Measure::Distance]);
///
/// let result = client.table(&request)?;
/// let minutes = result.durations.and_then(|m| m.get("a", "b").flatten());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct OsrmTableClient<T = HttpTransport> {
    transport: T,
    config: OsrmTableConfig,
    runtime: Runtime,
}

impl<T> fmt::Debug for OsrmTableClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsrmTableClient")
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl OsrmTableClient<HttpTransport> {
    /// Create a client for `base_url` with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(OsrmTableConfig::new(base_url))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: OsrmTableConfig) -> Result<Self, ClientBuildError> {
        let transport = HttpTransport::new(config.timeout, config.user_agent.as_str())
            .map_err(ClientBuildError::HttpClient)?;
        Self::with_transport(config, transport)
    }
}

impl<T: TableTransport> OsrmTableClient<T> {
    /// Create a client that fetches through `transport`.
    ///
    /// `config.timeout` and `config.user_agent` only apply to transports
    /// that read them at construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tokio runtime fails to build.
    pub fn with_transport(config: OsrmTableConfig, transport: T) -> Result<Self, ClientBuildError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            transport,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OsrmTableConfig {
        &self.config
    }

    /// The transport requests go through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode `request` and check it against the server's limits without
    /// sending it.
    ///
    /// # Errors
    ///
    /// Returns the same pre-flight errors as [`TableProvider::table`].
    pub fn prepare(&self, request: &TableRequest) -> Result<TableQuery, TableError> {
        let query = TableQuery::build(&self.config.server, request)?;
        check_limits(self.config.server.limits(), &query)?;
        Ok(query)
    }

    /// Fetch the matrices for `request`.
    ///
    /// # Errors
    ///
    /// Pre-flight errors are returned before any network traffic. Transport
    /// failures are retried and surface as [`TableError::Transport`] once the
    /// retry budget is spent. Service rejections and malformed bodies fail
    /// without retrying.
    pub async fn table_async(&self, request: &TableRequest) -> Result<TableResult, TableError> {
        let query = self.prepare(request)?;
        debug!(
            "requesting {} table cells from {}",
            query.cell_count(),
            query.as_str()
        );

        let transport = &self.transport;
        let url = query.url();
        let policy = self.config.retry;
        let outcome = policy
            .run(move |attempt| {
                debug!("table request attempt {attempt}/{}", policy.max_attempts());
                transport.fetch(url)
            })
            .await;
        let response = match outcome {
            RetryOutcome::Succeeded { value, .. } => value,
            RetryOutcome::Exhausted { error, attempts } => {
                error!("table request failed after {attempts} attempts: {error}");
                return Err(TableError::Transport {
                    attempts,
                    source: error,
                });
            }
        };

        reshape(validate(response)?, request.mode())
    }
}

impl<T: TableTransport> TableProvider for OsrmTableClient<T> {
    /// Fetch the matrices for `request`, blocking the calling thread.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`). If called from within a
    /// `current_thread` runtime, the method falls back to using its own
    /// internal runtime, which may block the caller's runtime and cause
    /// deadlocks if the caller's runtime is driving IO or timers needed by
    /// this request.
    fn table(&self, request: &TableRequest) -> Result<TableResult, TableError> {
        let future = self.table_async(request);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
