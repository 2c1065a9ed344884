//! Prelude module - commonly used types for convenient import.
//!
//! Use `use vouch_client::prelude::*;` to import all essential types.

// Client and configuration
pub use crate::{ApprovalClient, ClientConfig, HistoryFilter, PayClient, Payment, VaultCall};

// Errors
pub use crate::{ClientError, ClientResult};

// Domain types
pub use vouch_core::{
    ActionDraft, ActionHistory, ActionRecord, ActionRequest, ActionState, ActionStatus,
    ActionType, RiskLevel, SpendingReport, SpendingSummary, VaultService,
};
