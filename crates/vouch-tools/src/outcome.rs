//! Structured results returned across the adapter boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use vouch_client::ClientError;
use vouch_core::ActionState;

/// Final status reported to the agent runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The human (or rules engine) authorized the action.
    Approved,
    /// The action was denied.
    Denied,
    /// The request expired unresolved.
    Expired,
    /// No resolution within the adapter's wait window; the request may
    /// still resolve later on the backend.
    Timeout,
    /// Anything else: malformed input, backend failure, transport failure.
    Error,
}

/// The result object an adapter hands back to its runtime.
///
/// Serialized to JSON; absent companions are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// What happened.
    pub status: OutcomeStatus,
    /// The action request id, when one was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Denial reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Failure or timeout detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Who resolved the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    /// Content fingerprint, for verified flows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl ToolOutcome {
    fn bare(status: OutcomeStatus) -> Self {
        Self {
            status,
            id: None,
            reason: None,
            detail: None,
            verified_by: None,
            content_hash: None,
        }
    }

    /// An approved outcome.
    #[must_use]
    pub fn approved(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::bare(OutcomeStatus::Approved)
        }
    }

    /// A denied outcome.
    #[must_use]
    pub fn denied(id: Option<String>, reason: Option<String>) -> Self {
        Self {
            id,
            reason,
            ..Self::bare(OutcomeStatus::Denied)
        }
    }

    /// An expired outcome.
    #[must_use]
    pub fn expired(id: Option<String>) -> Self {
        Self {
            id,
            ..Self::bare(OutcomeStatus::Expired)
        }
    }

    /// A local-timeout outcome: the request was still pending when the
    /// adapter stopped waiting.
    #[must_use]
    pub fn timeout(id: impl Into<String>, waited_secs: u64) -> Self {
        Self {
            id: Some(id.into()),
            detail: Some(format!("no response within {waited_secs}s")),
            ..Self::bare(OutcomeStatus::Timeout)
        }
    }

    /// A generic error outcome.
    #[must_use]
    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::bare(OutcomeStatus::Error)
        }
    }

    /// Record who resolved the request.
    #[must_use]
    pub fn with_verified_by(mut self, verified_by: Option<String>) -> Self {
        self.verified_by = verified_by;
        self
    }

    /// Record the content fingerprint of a verified flow.
    #[must_use]
    pub fn with_content_hash(mut self, content_hash: Option<String>) -> Self {
        self.content_hash = content_hash;
        self
    }

    /// Map a terminal resolution snapshot into an outcome.
    pub(crate) fn from_resolution(
        id: &str,
        status: ActionState,
        verified_by: Option<String>,
        deny_reason: Option<String>,
    ) -> Self {
        match status {
            ActionState::Approved => Self::approved(id).with_verified_by(verified_by),
            ActionState::Denied => Self::denied(Some(id.to_string()), deny_reason),
            ActionState::Expired => Self::expired(Some(id.to_string())),
            ActionState::Pending => {
                Self::error(format!("request {id} unexpectedly still pending"))
            },
        }
    }

    /// Map a client failure into an outcome. This is the single place the
    /// closed error taxonomy crosses the adapter boundary as a value.
    #[must_use]
    pub fn from_error(err: &ClientError) -> Self {
        match err {
            ClientError::Denied { request_id, reason } => {
                Self::denied(Some(request_id.clone()), reason.clone())
            },
            ClientError::Expired { request_id } => Self::expired(Some(request_id.clone())),
            ClientError::Api { status, detail } => {
                Self::error(format!("API error {status}: {detail}"))
            },
            ClientError::RateLimited { detail, .. } => {
                Self::error(format!("rate limited: {detail}"))
            },
            other => Self::error(other.to_string()),
        }
    }

    /// Serialize for the runtime.
    #[must_use]
    pub fn into_value(self) -> Value {
        serde_json::to_value(&self).unwrap_or_else(|_| {
            json!({"status": "error", "detail": "outcome serialization failed"})
        })
    }
}
