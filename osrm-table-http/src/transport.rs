//! Fetching table responses over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use osrm_table_core::TransportError;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use url::Url;

use crate::osrm::TableResponse;

/// Something that can `GET` a table URL and decode the body.
///
/// Implementations report every failure as a [`TransportError`]; the client
/// retries all of them.
#[async_trait(?Send)]
pub trait TableTransport {
    /// Fetch and decode the response for `url`.
    async fn fetch(&self, url: &Url) -> Result<TableResponse, TransportError>;
}

/// [`TableTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
    user_agent: String,
}

impl HttpTransport {
    /// Build a transport with the given per-request timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            timeout,
            user_agent: user_agent.into(),
        })
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_owned(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }

        if let Some(status) = error.status() {
            return TransportError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl TableTransport for HttpTransport {
    /// OSRM reports rejections as JSON alongside a 4xx status, so the body is
    /// decoded whatever the status. Only an undecodable body on an error
    /// status becomes [`TransportError::Http`].
    async fn fetch(&self, url: &Url) -> Result<TableResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;

        serde_json::from_str(&body).map_err(|err| {
            if status.is_client_error() || status.is_server_error() {
                TransportError::Http {
                    url: url.as_str().to_owned(),
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .map_or_else(|| err.to_string(), str::to_owned),
                }
            } else {
                TransportError::Decode {
                    url: url.as_str().to_owned(),
                    message: err.to_string(),
                }
            }
        })
    }
}
