//! Vault-backed execution.
//!
//! The backend holds third-party credentials; the agent describes the HTTP
//! call it wants, a human approves it, and the backend executes the call
//! with the stored credential injected. The agent never observes the
//! credential value, and each approval is single-use.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::debug;

use vouch_core::{ActionDraft, ActionState, ActionStatus, ActionType, RiskLevel, VaultService};

use crate::client::ApprovalClient;
use crate::error::{ClientError, ClientResult};

/// Default wait for human approval of a vault call.
const DEFAULT_VAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default poll cadence while waiting for vault approval.
const DEFAULT_VAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Description of an HTTP call to execute through the vault.
///
/// The URL's host must be on the service's allow-list
/// (see [`VaultService::allowed_hosts`]); the backend rejects anything else
/// so a credential cannot be exfiltrated to an arbitrary destination.
#[derive(Debug, Clone)]
pub struct VaultCall {
    /// Vault service holding the credential.
    pub service_name: String,
    /// HTTP method (GET, POST, PUT, PATCH, DELETE).
    pub method: String,
    /// Full URL to call.
    pub url: String,
    /// Additional headers; the auth header is injected server-side.
    pub headers: BTreeMap<String, String>,
    /// Request body, typically a JSON string.
    pub body: Option<String>,
    /// Human-readable description shown in the approval prompt.
    pub description: Option<String>,
    /// Maximum wait for approval.
    pub timeout: Duration,
    /// Poll cadence while waiting.
    pub poll_interval: Duration,
}

impl VaultCall {
    /// Describe a vault call with default timeout and poll cadence.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        method: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            method: method.into(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            description: None,
            timeout: DEFAULT_VAULT_TIMEOUT,
            poll_interval: DEFAULT_VAULT_POLL_INTERVAL,
        }
    }

    /// Add a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the description shown to the approver.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the approval wait timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the poll cadence.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Build the approval request describing this call.
    fn into_draft(self) -> ActionDraft {
        let title = self
            .description
            .clone()
            .unwrap_or_else(|| format!("API call: {} {}", self.method, self.url));
        let description = format!(
            "Service: {} | {} {}",
            self.service_name, self.method, self.url
        );

        let headers: Map<String, Value> = self
            .headers
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();

        let mut metadata = Map::new();
        metadata.insert("vault_execute".to_string(), Value::Bool(true));
        metadata.insert(
            "service_name".to_string(),
            Value::String(self.service_name),
        );
        metadata.insert("method".to_string(), Value::String(self.method));
        metadata.insert("url".to_string(), Value::String(self.url));
        metadata.insert("headers".to_string(), Value::Object(headers));
        metadata.insert(
            "body".to_string(),
            self.body.map_or(Value::Null, Value::String),
        );

        ActionDraft::new(ActionType::DataAccess, title)
            .with_risk_level(RiskLevel::Medium)
            .with_description(description)
            .with_metadata(metadata)
    }
}

impl ApprovalClient {
    /// List the vault services available to this agent.
    ///
    /// Only metadata is returned - service names, auth types, and host
    /// allow-lists - never credential values.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see [`ClientError`].
    pub async fn list_vault_services(&self) -> ClientResult<Vec<VaultService>> {
        let list: VaultServiceList = self
            .send(self.http.get(self.url("/vault/services")))
            .await?;
        Ok(list.services)
    }

    /// Execute an HTTP call through the vault after human approval.
    ///
    /// Three phases:
    ///
    /// 1. Create an approval request tagged with the call's details. The
    ///    rules engine may resolve it synchronously - an immediate denial
    ///    short-circuits with no further network calls.
    /// 2. While the request is pending, poll with the call's own timeout
    ///    and cadence, stopping the moment the status leaves `pending`.
    /// 3. On approval, ask the backend to execute the call with the stored
    ///    credential and return the proxied response.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Denied`] - the request was denied, immediately or
    ///   after the wait, with the reason when one was given.
    /// - [`ClientError::Expired`] - the request expired unresolved.
    /// - [`ClientError::VaultExecution`] - the wait ended in any other
    ///   non-approved state (including still pending after the timeout).
    /// - [`ClientError::Api`] / [`ClientError::RateLimited`] /
    ///   [`ClientError::Transport`] - HTTP-level failures at any phase.
    pub async fn execute_vault_call(&self, call: VaultCall) -> ClientResult<Value> {
        let timeout = call.timeout;
        let poll_interval = call.poll_interval;

        let created = self.request_action(call.into_draft()).await?;
        debug!(request_id = %created.id, status = %created.status, "vault call submitted");

        if created.status == ActionState::Denied {
            return Err(ClientError::Denied {
                request_id: created.id,
                reason: created.deny_reason,
            });
        }

        let resolution = if created.status == ActionState::Pending {
            self.wait_for_result(&created.id, timeout, poll_interval)
                .await?
        } else {
            ActionStatus {
                status: created.status,
                verified_by: None,
                deny_reason: created.deny_reason,
            }
        };

        match resolution.status {
            ActionState::Approved => {
                self.send(
                    self.http
                        .post(self.url(&format!("/vault/execute/{}", created.id))),
                )
                .await
            },
            ActionState::Denied => Err(ClientError::Denied {
                request_id: created.id,
                reason: resolution.deny_reason,
            }),
            ActionState::Expired => Err(ClientError::Expired {
                request_id: created.id,
            }),
            ActionState::Pending => Err(ClientError::VaultExecution {
                detail: format!(
                    "no approval for request {} within {}s",
                    created.id,
                    timeout.as_secs()
                ),
            }),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct VaultServiceList {
    services: Vec<VaultService>,
}
