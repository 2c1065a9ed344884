//! The general approval gate tool.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use vouch_client::ApprovalClient;
use vouch_core::{ActionDraft, ActionType, RiskLevel};

use crate::AgentTool;
use crate::outcome::ToolOutcome;

/// How long the tool waits for a human by default.
const DEFAULT_WAIT: Duration = Duration::from_secs(120);

/// Poll cadence while waiting.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Gates agent actions through human approval.
///
/// Register this with an agent runtime; when the agent decides to take a
/// consequential action it calls the tool, the human gets a notification,
/// and the tool returns the resolution as JSON.
///
/// This tool deliberately layers stricter semantics on the wait protocol:
/// a request still pending after the wait window is reported as
/// `status = "timeout"`, because an LLM loop cannot usefully keep holding
/// an unresolved request. The underlying client treats the same situation
/// as a normal pending snapshot.
pub struct RequestApprovalTool {
    client: Arc<ApprovalClient>,
    timeout: Duration,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct ApprovalArgs {
    action_type: ActionType,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    risk_level: Option<RiskLevel>,
}

impl RequestApprovalTool {
    /// Create the tool with the default wait window and cadence.
    #[must_use]
    pub fn new(client: Arc<ApprovalClient>) -> Self {
        Self {
            client,
            timeout: DEFAULT_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override how long the tool waits before reporting a timeout.
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

    async fn run(&self, args: ApprovalArgs) -> ToolOutcome {
        let mut draft = ActionDraft::new(args.action_type, args.title)
            .with_risk_level(args.risk_level.unwrap_or_default());
        if let Some(description) = args.description {
            draft = draft.with_description(description);
        }

        let created = match self.client.request_action(draft).await {
            Ok(created) => created,
            Err(err) => return ToolOutcome::from_error(&err),
        };

        // Auto-resolved by the rules engine: report it without a single
        // status fetch.
        if created.status.is_terminal() {
            debug!(id = %created.id, status = %created.status, "resolved at submission");
            return ToolOutcome::from_resolution(
                &created.id,
                created.status,
                None,
                created.deny_reason,
            );
        }

        crate::wait::resolve(&self.client, &created.id, self.timeout, self.poll_interval).await
    }
}

#[async_trait::async_trait]
impl AgentTool for RequestApprovalTool {
    fn name(&self) -> &'static str {
        "request_human_approval"
    }

    fn description(&self) -> &'static str {
        "Request human approval for a sensitive action. The human receives a \
         notification and approves or denies on their device. Use this BEFORE \
         executing any action that sends data, spends money, modifies systems, \
         or has real-world consequences. Returns a JSON object whose status is \
         approved, denied, expired, timeout, or error."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action_type": {
                    "type": "string",
                    "enum": [
                        "communication", "purchase", "data_access",
                        "legal", "system", "scheduling", "social"
                    ],
                    "description": "Category of the action."
                },
                "title": {
                    "type": "string",
                    "description": "Short description shown to the human approver."
                },
                "description": {
                    "type": "string",
                    "description": "Detailed explanation of the action and why it's needed."
                },
                "risk_level": {
                    "type": "string",
                    "enum": ["low", "medium", "high", "critical"],
                    "description": "Risk level; defaults to medium."
                }
            },
            "required": ["action_type", "title"]
        })
    }

    async fn invoke(&self, args: Value) -> Value {
        let args: ApprovalArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(err) => {
                return ToolOutcome::error(format!("invalid arguments: {err}")).into_value();
            },
        };
        self.run(args).await.into_value()
    }
}
