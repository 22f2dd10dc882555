use thiserror::Error;

use crate::input::InputError;

/// Transport-level failures; these consume the retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The connection could not be established or was interrupted.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },
    /// The server answered with an error status and no decodable body.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The body was not valid table-service JSON.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Request URL.
        url: String,
        /// Decoder description.
        message: String,
    },
}

/// Errors from [`crate::TableProvider::table`].
///
/// Only [`TableError::Transport`] is produced after network retries; every
/// other variant fails immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The point inputs could not be normalised.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The active server does not support a requested option.
    #[error("{server} does not support {option}")]
    UnsupportedOption {
        /// Option name.
        option: &'static str,
        /// Server base URL.
        server: String,
    },
    /// The exclude list holds characters outside OSRM class names.
    #[error("invalid exclude list {value:?}: class names may only use A-Z, a-z, 0-9 and _")]
    InvalidExclude {
        /// The rejected exclude list.
        value: String,
    },
    /// Coordinates could not be compactly encoded.
    #[error("failed to encode coordinates: {message}")]
    CoordinateEncoding {
        /// Encoder description.
        message: String,
    },
    /// The request URL could not be assembled.
    #[error("invalid request URL {url:?}: {message}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser description.
        message: String,
    },
    /// The projected matrix is larger than the server accepts.
    #[error("request asks for {cells} matrix cells but the server allows at most {max}")]
    TooManyCells {
        /// Sources × destinations.
        cells: usize,
        /// Configured ceiling.
        max: usize,
    },
    /// The encoded request is longer than the server accepts.
    #[error("request URL is {length} characters long but the server allows at most {max}")]
    RequestTooLong {
        /// Encoded URL length.
        length: usize,
        /// Configured ceiling.
        max: usize,
    },
    /// Every attempt failed at the transport level.
    #[error("giving up after {attempts} attempts: {source}")]
    Transport {
        /// Attempts made.
        attempts: u32,
        /// Last failure observed.
        source: TransportError,
    },
    /// The server rejected the request.
    #[error("the routing server returned an error: {code}: {message}")]
    Service {
        /// Status code reported by the server, e.g. `"InvalidQuery"`.
        code: String,
        /// Accompanying message, possibly empty.
        message: String,
    },
    /// The response lacked a status or did not match the request.
    #[error("malformed response from the routing server: {message}")]
    MalformedResponse {
        /// Description of the problem.
        message: String,
    },
}
