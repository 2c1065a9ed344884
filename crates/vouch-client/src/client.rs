//! The approval client: authenticated requests, status fetches, and the
//! blocking wait protocol.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::time::{Instant, sleep};
use tracing::{debug, error, warn};

use vouch_core::{
    ActionDraft, ActionHistory, ActionRequest, ActionState, ActionStatus, ActionType, RiskLevel,
    SpendingReport, fingerprint,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Versioned path prefix of the backend API.
const API_PREFIX: &str = "/api/v1";

/// Header carrying the static per-agent key.
const API_KEY_HEADER: &str = "X-API-Key";

/// Client for requesting human-authorized actions.
///
/// Holds a reusable connection pool and no per-request state, so a single
/// instance can be shared across tasks.
#[derive(Debug)]
pub struct ApprovalClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ClientConfig,
}

impl ApprovalClient {
    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the API key contains characters
    /// that cannot appear in a header, or [`ClientError::Transport`] when
    /// the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut api_key = HeaderValue::try_from(config.api_key.as_str())
            .map_err(|e| ClientError::Config(format!("invalid API key characters: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { http, config })
    }

    /// Create a client configured entirely from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when `VOUCH_API_KEY` is unset.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Submit an action for human authorization. Returns immediately.
    ///
    /// The returned snapshot's status may already be terminal: the backend's
    /// rules engine can auto-approve or auto-deny without human interaction.
    /// Callers must branch on the status rather than assume `pending`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see [`ClientError`].
    pub async fn request_action(&self, draft: ActionDraft) -> ClientResult<ActionRequest> {
        debug!(
            action_type = %draft.action_type,
            risk_level = %draft.risk_level,
            title = %draft.title,
            "submitting action request"
        );
        self.send(self.http.post(self.url("/actions")).json(&draft))
            .await
    }

    /// Fetch the current status of an action request.
    ///
    /// Pure read with no local caching; safe to call repeatedly. The
    /// backend's state may change between calls.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see [`ClientError`].
    pub async fn get_status(&self, request_id: &str) -> ClientResult<ActionStatus> {
        self.send(self.http.get(self.url(&format!("/actions/{request_id}"))))
            .await
    }

    /// Block until the action resolves or `timeout` elapses, checking every
    /// `poll_interval`.
    ///
    /// On timeout this performs exactly one final status check and returns
    /// its result *even if still pending*: a pending snapshot after timeout
    /// is a valid outcome, not an error. Callers wanting stricter semantics
    /// (treating still-pending as a failure) layer them on top.
    ///
    /// # Errors
    ///
    /// Only for failed status fetches; never for the timeout itself.
    pub async fn wait_for_result(
        &self,
        request_id: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> ClientResult<ActionStatus> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            let snapshot = self.get_status(request_id).await?;
            if snapshot.status.is_terminal() {
                debug!(%request_id, status = %snapshot.status, "action resolved");
                return Ok(snapshot);
            }
            sleep(self.poll_delay(poll_interval)).await;
        }
        // Local timeout: one last look at the backend's state.
        self.get_status(request_id).await
    }

    /// Fetch this agent's past action requests.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see [`ClientError`].
    pub async fn get_history(&self, filter: HistoryFilter) -> ClientResult<ActionHistory> {
        let mut request = self.http.get(self.url("/actions"));
        if let Some(limit) = filter.limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        if let Some(status) = filter.status {
            request = request.query(&[("status", status.to_string())]);
        }
        if let Some(action_type) = filter.action_type {
            request = request.query(&[("action_type", action_type.to_string())]);
        }
        self.send(request).await
    }

    /// Fetch this agent's current spend against every applicable limit.
    ///
    /// Useful before a purchase: each summary carries the limit, the amount
    /// spent, the amount remaining, and utilization.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see [`ClientError`].
    pub async fn get_spending_summary(&self) -> ClientResult<SpendingReport> {
        self.send(self.http.get(self.url("/agent/spending-summary")))
            .await
    }

    /// Submit a content-verified ("what you see is what you sign") action.
    ///
    /// The exact parameter map travels in the request metadata together with
    /// its locally computed fingerprint; the approver sees those parameters
    /// and the backend reports the fingerprint it hashed. Compare with
    /// [`ActionRequest::matches_params`] to confirm no parameter was altered
    /// between display and execution.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see [`ClientError`].
    pub async fn request_verified_action(
        &self,
        action_type: ActionType,
        title: impl Into<String>,
        risk_level: RiskLevel,
        params: Map<String, Value>,
    ) -> ClientResult<ActionRequest> {
        let fingerprint = fingerprint::content_hash(&params);
        let mut metadata = Map::new();
        metadata.insert("wysiwys".to_string(), Value::Bool(true));
        metadata.insert("content_hash".to_string(), Value::String(fingerprint));
        metadata.insert("params".to_string(), Value::Object(params));

        let draft = ActionDraft::new(action_type, title)
            .with_risk_level(risk_level)
            .with_metadata(metadata);
        self.request_action(draft).await
    }

    /// Like [`request_verified_action`](Self::request_verified_action), but
    /// takes the parameters as a JSON object string, as agent runtimes
    /// usually supply them.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParams`] when the string is not a JSON
    /// object - reported immediately, before any network call. Otherwise
    /// the classified backend failure.
    pub async fn request_verified_action_json(
        &self,
        action_type: ActionType,
        title: impl Into<String>,
        risk_level: RiskLevel,
        params_json: &str,
    ) -> ClientResult<ActionRequest> {
        let params: Map<String, Value> = serde_json::from_str(params_json)
            .map_err(|_| ClientError::InvalidParams("invalid JSON in parameters".to_string()))?;
        self.request_verified_action(action_type, title, risk_level, params)
            .await
    }

    /// Content-verified social post: the approver sees the exact channel and
    /// text.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see [`ClientError`].
    pub async fn request_verified_message(
        &self,
        channel: &str,
        text: &str,
    ) -> ClientResult<ActionRequest> {
        let mut params = Map::new();
        params.insert("channel".to_string(), Value::String(channel.to_string()));
        params.insert("text".to_string(), Value::String(text.to_string()));
        self.request_verified_action(
            ActionType::Social,
            format!("Post to {channel}"),
            RiskLevel::Medium,
            params,
        )
        .await
    }

    /// One poll sleep, with the configured jitter applied.
    fn poll_delay(&self, interval: Duration) -> Duration {
        match self.config.poll_jitter {
            Some(jitter) if !jitter.is_zero() => {
                interval.saturating_add(rand::thread_rng().gen_range(Duration::ZERO..jitter))
            },
            _ => interval,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.config.base_url)
    }

    /// Issue a request and classify the response.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        let response = request.send().await?;
        let response = classify(response).await?;
        Ok(response.json().await?)
    }
}

/// Convert a non-2xx response into the failure taxonomy.
///
/// The detail string prefers a `detail` field in a JSON body and falls back
/// to the raw body text; an unparseable body is never itself an error.
async fn classify(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after_secs = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok());

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|parsed| {
            parsed
                .get("detail")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!(?retry_after_secs, "rate limited by backend");
        return Err(ClientError::RateLimited {
            retry_after_secs,
            detail: if detail.is_empty() {
                "rate limit exceeded".to_string()
            } else {
                detail
            },
        });
    }

    error!(status = %status, detail = %detail, "backend request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        detail,
    })
}

/// Filters for the action history endpoint. Unset filters are omitted from
/// the query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryFilter {
    /// Maximum number of records to return.
    pub limit: Option<u32>,
    /// Only records in this state.
    pub status: Option<ActionState>,
    /// Only records in this category.
    pub action_type: Option<ActionType>,
}

impl HistoryFilter {
    /// Limit the number of records.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only records in the given state.
    #[must_use]
    pub fn with_status(mut self, status: ActionState) -> Self {
        self.status = Some(status);
        self
    }

    /// Only records in the given category.
    #[must_use]
    pub fn with_action_type(mut self, action_type: ActionType) -> Self {
        self.action_type = Some(action_type);
        self
    }
}
