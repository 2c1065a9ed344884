//! The content-verified approval tool.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use vouch_client::ApprovalClient;
use vouch_core::{ActionType, RiskLevel};

use crate::AgentTool;
use crate::outcome::ToolOutcome;

const DEFAULT_WAIT: Duration = Duration::from_secs(120);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Content-verified ("what you see is what you sign") approval.
///
/// The agent supplies the exact parameters of the action as a JSON string;
/// the human sees those parameters and a content fingerprint proves no
/// bait-and-switch between display and execution. Use for financial
/// transactions, API calls, or any action where exact parameters matter.
pub struct WysiwysApprovalTool {
    client: Arc<ApprovalClient>,
    timeout: Duration,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct WysiwysArgs {
    action_type: ActionType,
    title: String,
    parameters: String,
    #[serde(default)]
    risk_level: Option<RiskLevel>,
}

impl WysiwysApprovalTool {
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

    async fn run(&self, args: WysiwysArgs) -> ToolOutcome {
        // Verified flows default to high risk: exact parameters usually
        // mean money or data on the line.
        let risk_level = args.risk_level.unwrap_or(RiskLevel::High);

        // Malformed parameters surface as InvalidParams before any network
        // call, and become an error outcome like every other failure.
        let created = match self
            .client
            .request_verified_action_json(
                args.action_type,
                args.title,
                risk_level,
                &args.parameters,
            )
            .await
        {
            Ok(created) => created,
            Err(err) => return ToolOutcome::from_error(&err),
        };
        let content_hash = created.content_hash.clone();

        let outcome = if created.status.is_terminal() {
            ToolOutcome::from_resolution(&created.id, created.status, None, created.deny_reason)
        } else {
            crate::wait::resolve(&self.client, &created.id, self.timeout, self.poll_interval)
                .await
        };
        outcome.with_content_hash(content_hash)
    }
}

#[async_trait::async_trait]
impl AgentTool for WysiwysApprovalTool {
    fn name(&self) -> &'static str {
        "request_verified_approval"
    }

    fn description(&self) -> &'static str {
        "Request human approval with WYSIWYS content verification. Pass the \
         exact action parameters as a JSON string: the human sees exactly \
         those parameters and a content hash proves they cannot be swapped \
         after approval. Use for trades, payments, and API calls where the \
         precise values matter. Returns a JSON object whose status is \
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
                "parameters": {
                    "type": "string",
                    "description": "JSON object string of the exact action parameters."
                },
                "risk_level": {
                    "type": "string",
                    "enum": ["low", "medium", "high", "critical"],
                    "description": "Risk level; defaults to high."
                }
            },
            "required": ["action_type", "title", "parameters"]
        })
    }

    async fn invoke(&self, args: Value) -> Value {
        let args: WysiwysArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(err) => {
                return ToolOutcome::error(format!("invalid arguments: {err}")).into_value();
            },
        };
        self.run(args).await.into_value()
    }
}
