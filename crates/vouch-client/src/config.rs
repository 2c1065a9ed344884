//! Client configuration.
//!
//! The backend URL is resolved exactly once, here: explicit override, then
//! the `VOUCH_BASE_URL` environment variable, then the single hardcoded
//! default. No other module carries an endpoint literal.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Default backend endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.vouch.dev";

/// Environment variable overriding the backend endpoint.
const BASE_URL_ENV: &str = "VOUCH_BASE_URL";

/// Environment variable supplying the agent API key.
const API_KEY_ENV: &str = "VOUCH_API_KEY";

/// Default per-request deadline.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an [`ApprovalClient`](crate::ApprovalClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Static per-agent API key, sent in the `X-API-Key` header.
    pub api_key: String,
    /// Backend base URL, without the `/api/v1` prefix or a trailing slash.
    pub base_url: String,
    /// Deadline applied to every individual HTTP request.
    pub request_timeout: Duration,
    /// Optional uniform jitter added to each poll sleep.
    ///
    /// `None` keeps the documented fixed-interval cadence. Setting a jitter
    /// desynchronizes fleets of agents that would otherwise poll in
    /// lockstep.
    pub poll_jitter: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration with the given API key and the resolved
    /// default base URL.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: resolve_base_url(None),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_jitter: None,
        }
    }

    /// Create a configuration from the environment.
    ///
    /// Reads the API key from `VOUCH_API_KEY` and the base URL from
    /// `VOUCH_BASE_URL` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when `VOUCH_API_KEY` is unset or
    /// empty.
    pub fn from_env() -> ClientResult<Self> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ClientError::Config(format!("API key required: set {API_KEY_ENV}"))
            })?;
        Ok(Self::new(api_key))
    }

    /// Override the backend base URL. A trailing slash is trimmed.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = resolve_base_url(Some(base_url.as_ref()));
        self
    }

    /// Override the per-request deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Add uniform random jitter (0..`jitter`) to each poll sleep.
    #[must_use]
    pub fn with_poll_jitter(mut self, jitter: Duration) -> Self {
        self.poll_jitter = Some(jitter);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("has_api_key", &!self.api_key.is_empty())
            .field("request_timeout", &self.request_timeout)
            .field("poll_jitter", &self.poll_jitter)
            .finish()
    }
}

/// Resolve the backend URL: explicit override, then environment, then the
/// default constant.
fn resolve_base_url(explicit: Option<&str>) -> String {
    base_url_from(explicit, env::var(BASE_URL_ENV).ok())
}

fn base_url_from(explicit: Option<&str>, env_value: Option<String>) -> String {
    let chosen = match explicit {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => env_value
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
    };
    chosen.trim_end_matches('/').to_string()
}
