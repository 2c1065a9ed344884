//! Shared wait-and-map step for the approval tools.

use std::time::Duration;

use vouch_client::ApprovalClient;
use vouch_core::ActionState;

use crate::outcome::ToolOutcome;

/// Wait for a pending request and map the result for the runtime.
///
/// This is the call site that treats pending-after-timeout as exceptional:
/// the client returns it as a normal snapshot, and here it becomes a
/// `timeout` outcome.
pub(crate) async fn resolve(
    client: &ApprovalClient,
    request_id: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> ToolOutcome {
    match client
        .wait_for_result(request_id, timeout, poll_interval)
        .await
    {
        Ok(snapshot) if snapshot.status == ActionState::Pending => {
            ToolOutcome::timeout(request_id, timeout.as_secs())
        },
        Ok(snapshot) => ToolOutcome::from_resolution(
            request_id,
            snapshot.status,
            snapshot.verified_by,
            snapshot.deny_reason,
        ),
        Err(err) => ToolOutcome::from_error(&err),
    }
}
