//! Budget-check tool.

use std::sync::Arc;

use serde_json::{Value, json};

use vouch_client::ApprovalClient;

use crate::AgentTool;
use crate::outcome::ToolOutcome;

/// Reports the agent's spend against its configured limits.
///
/// Agents call this before a purchase to learn whether budget remains,
/// instead of submitting a payment that the rules engine will auto-deny.
pub struct CheckSpendingTool {
    client: Arc<ApprovalClient>,
}

impl CheckSpendingTool {
    /// Create the tool.
    #[must_use]
    pub fn new(client: Arc<ApprovalClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AgentTool for CheckSpendingTool {
    fn name(&self) -> &'static str {
        "check_spending_limits"
    }

    fn description(&self) -> &'static str {
        "Check remaining budget before making purchases. Returns spending \
         summaries for every limit that applies to this agent: the limit, \
         amount spent, amount remaining, and utilization percentage."
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn invoke(&self, _args: Value) -> Value {
        match self.client.get_spending_summary().await {
            Ok(report) => serde_json::to_value(&report).unwrap_or_else(|_| {
                ToolOutcome::error("report serialization failed").into_value()
            }),
            Err(err) => ToolOutcome::from_error(&err).into_value(),
        }
    }
}
