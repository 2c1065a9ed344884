//! Core enums and wire snapshot types.
//!
//! The enums serialize to the backend's snake_case wire names; the `Display`
//! impls produce the same strings so query parameters and log fields match
//! the wire exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::fingerprint;

/// Category of an action submitted for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Emails, messages, outbound communication.
    Communication,
    /// Payments and subscriptions.
    Purchase,
    /// Databases, files, third-party APIs.
    DataAccess,
    /// Contracts and legal commitments.
    Legal,
    /// Infrastructure and deployments.
    System,
    /// Bookings and calendar changes.
    Scheduling,
    /// Posts to social platforms.
    Social,
}

impl ActionType {
    /// Default risk level assigned when a draft does not override it.
    #[must_use]
    pub fn default_risk_level(self) -> RiskLevel {
        match self {
            Self::Communication | Self::Scheduling => RiskLevel::Low,
            Self::Purchase | Self::Social => RiskLevel::Medium,
            Self::DataAccess | Self::System => RiskLevel::High,
            Self::Legal => RiskLevel::Critical,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Communication => write!(f, "communication"),
            Self::Purchase => write!(f, "purchase"),
            Self::DataAccess => write!(f, "data_access"),
            Self::Legal => write!(f, "legal"),
            Self::System => write!(f, "system"),
            Self::Scheduling => write!(f, "scheduling"),
            Self::Social => write!(f, "social"),
        }
    }
}

/// Risk level classification for an action.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Low risk - routine, easily undone.
    Low,
    /// Medium risk - the backend default when unspecified.
    #[default]
    Medium,
    /// High risk - consequential or hard to undo.
    High,
    /// Critical risk - irreversible, legally or financially binding.
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Resolution state of an action request.
///
/// The backend enforces a monotonic transition: once a request leaves
/// `pending` it never returns. The client only observes snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    /// Awaiting resolution.
    Pending,
    /// Authorized by a human or the rules engine.
    Approved,
    /// Rejected by a human or the rules engine.
    Denied,
    /// No resolution within the request's expiry window.
    Expired,
}

impl ActionState {
    /// Whether this state is terminal. `pending` is the only non-terminal
    /// state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Denied => write!(f, "denied"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// Snapshot returned when an action request is created.
///
/// The initial status may already be terminal: the backend's rules engine
/// can auto-approve or auto-deny before any human sees the request. Callers
/// must branch on [`ActionRequest::status`] rather than assume `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Backend-assigned opaque identifier.
    pub id: String,
    /// Status at creation time.
    pub status: ActionState,
    /// Content fingerprint, present only for content-verified requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// Denial reason when the rules engine auto-denied synchronously.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny_reason: Option<String>,
}

impl ActionRequest {
    /// Check a content-verified request against the exact parameter map the
    /// caller submitted.
    ///
    /// Recomputes the fingerprint locally and compares it to the
    /// backend-reported `content_hash`. Returns `false` when the request
    /// carries no fingerprint or the hashes differ.
    #[must_use]
    pub fn matches_params(&self, params: &Map<String, Value>) -> bool {
        self.content_hash.as_deref() == Some(fingerprint::content_hash(params).as_str())
    }
}

/// Snapshot of an action request's current resolution state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionStatus {
    /// Current status.
    pub status: ActionState,
    /// Identity of the human who resolved the request, when resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    /// Reason given on denial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny_reason: Option<String>,
}

/// A past action request, as returned by the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Backend-assigned identifier.
    pub id: String,
    /// Category of the action.
    pub action_type: ActionType,
    /// Human-readable summary shown to the approver.
    pub title: String,
    /// Resolution state at query time.
    pub status: ActionState,
    /// Risk level the request was submitted with.
    pub risk_level: RiskLevel,
    /// When the request was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A page of past action requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionHistory {
    /// Matching records, newest first.
    pub actions: Vec<ActionRecord>,
}

/// A credential binding stored in the backend's vault.
///
/// The client only ever observes service metadata; credential values stay
/// in the backend and are injected server-side after approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultService {
    /// Name used to address the service in vault calls.
    pub service_name: String,
    /// How the stored credential is presented (e.g. bearer, header).
    pub auth_type: String,
    /// Hosts the credential may be sent to. Calls outside this list are
    /// rejected by the backend.
    pub allowed_hosts: Vec<String>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Spend against a single configured limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    /// Identifier of the limit this summary reports on.
    pub limit_id: String,
    /// Category the limit applies to, if scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    /// Accounting period (e.g. daily, monthly).
    pub period: String,
    /// Configured ceiling.
    pub limit: f64,
    /// Amount spent by this agent within the period.
    pub spent: f64,
    /// Amount remaining.
    pub remaining: f64,
    /// Spent as a percentage of the limit.
    pub utilization_pct: f64,
}

/// Spending summaries for every limit that applies to the calling agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingReport {
    /// The agent these summaries are scoped to.
    pub agent_id: String,
    /// One summary per applicable limit.
    pub summaries: Vec<SpendingSummary>,
}
