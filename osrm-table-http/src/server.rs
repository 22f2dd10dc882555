//! Routing server endpoints and the limits each one enforces.
//!
//! The shared public demo at `router.project-osrm.org` only answers duration
//! tables for plain coordinate lists and caps the matrix size, so requests
//! aimed at it are shaped and guarded more strictly than those sent to a
//! self-hosted instance.

use url::Url;

/// Base URL of the public demo server.
pub const PUBLIC_DEMO_URL: &str = "https://router.project-osrm.org";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Routing profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "driving";

/// Longest request URL sent to any server.
pub const DEFAULT_MAX_URL_LENGTH: usize = 8_000;

/// Largest matrix the public demo computes.
pub const PUBLIC_DEMO_MAX_CELLS: usize = 10_000;

const PUBLIC_DEMO_HOST: &str = "router.project-osrm.org";

/// Pre-flight ceilings applied before a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    /// Maximum `sources × destinations`; `None` defers to the server's own
    /// `--max-table-size`.
    pub max_cells: Option<usize>,
    /// Maximum length of the encoded request URL.
    pub max_url_length: usize,
}

impl RequestLimits {
    /// Limits enforced by the public demo server.
    #[must_use]
    pub const fn public_demo() -> Self {
        Self {
            max_cells: Some(PUBLIC_DEMO_MAX_CELLS),
            max_url_length: DEFAULT_MAX_URL_LENGTH,
        }
    }

    /// Limits for a self-hosted server.
    #[must_use]
    pub const fn self_hosted() -> Self {
        Self {
            max_cells: None,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
        }
    }
}

/// The active routing server.
///
/// # Examples
///
/// ```
/// use osrm_table_http::{RequestLimits, ServerConfig};
///
/// let demo = ServerConfig::new("https://router.project-osrm.org/");
/// assert!(demo.is_public_demo());
/// assert_eq!(demo.limits(), RequestLimits::public_demo());
///
/// let local = ServerConfig::new("http://localhost:5000").with_profile("foot");
/// assert!(!local.is_public_demo());
/// assert_eq!(local.profile(), "foot");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    base_url: String,
    profile: String,
    limits: RequestLimits,
    public_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ServerConfig {
    /// Configure the server at `base_url`.
    ///
    /// Trailing slashes are trimmed; an empty URL falls back to
    /// [`DEFAULT_BASE_URL`]. Limits default to those of the detected server
    /// kind.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = sanitise_base_url(base_url);
        let public_demo = is_public_demo_url(&base_url);
        let limits = if public_demo {
            RequestLimits::public_demo()
        } else {
            RequestLimits::self_hosted()
        };
        Self {
            base_url,
            profile: DEFAULT_PROFILE.to_owned(),
            limits,
            public_demo,
        }
    }

    /// Configure the public demo server.
    #[must_use]
    pub fn public_demo() -> Self {
        Self::new(PUBLIC_DEMO_URL)
    }

    /// Set the routing profile path segment, e.g. `"driving"`.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Override the pre-flight limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: RequestLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Base URL without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Routing profile path segment.
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Active pre-flight limits.
    #[must_use]
    pub const fn limits(&self) -> RequestLimits {
        self.limits
    }

    /// Whether this is the capability-restricted public demo.
    #[must_use]
    pub const fn is_public_demo(&self) -> bool {
        self.public_demo
    }
}

fn sanitise_base_url(url: impl Into<String>) -> String {
    let raw = url.into();
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn is_public_demo_url(base_url: &str) -> bool {
    Url::parse(base_url)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| host.eq_ignore_ascii_case(PUBLIC_DEMO_HOST))
        })
        .unwrap_or(false)
}
