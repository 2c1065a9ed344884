#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Agent-framework adapters for Vouch approval.
//!
//! Each adapter is a named callable tool with a declared JSON input schema,
//! suitable for registration with any agent runtime that invokes tools and
//! expects a JSON result back. The adapters are a leaf over
//! [`vouch_client`]: the core client stays framework-agnostic, and whether
//! an adapter is wired into a runtime never affects client behavior.
//!
//! Host agent runtimes expect a return value, not an exception, so
//! [`AgentTool::invoke`] is infallible by contract: every client failure is
//! caught here and converted into a structured [`ToolOutcome`] with a
//! `status` of `approved`, `denied`, `expired`, `timeout`, or `error`.

mod approval;
mod outcome;
mod spending;
mod wait;
mod wysiwys;

pub use approval::RequestApprovalTool;
pub use outcome::{OutcomeStatus, ToolOutcome};
pub use spending::CheckSpendingTool;
pub use wysiwys::WysiwysApprovalTool;

use serde_json::Value;

/// A callable action exposed to an agent runtime.
#[async_trait::async_trait]
pub trait AgentTool: Send + Sync {
    /// Tool name, as registered with the runtime.
    fn name(&self) -> &'static str;

    /// Human-readable description for the LLM.
    fn description(&self) -> &'static str;

    /// JSON schema for tool input parameters.
    fn input_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    ///
    /// Never fails: malformed arguments and every backend failure are
    /// converted into a structured result value.
    async fn invoke(&self, args: Value) -> Value;
}
