//! Vouch Core - domain types for human-authorized agent actions.
//!
//! This crate holds the types shared by the Vouch client and the
//! agent-framework adapters:
//!
//! - **Categories and risk**: [`ActionType`], [`RiskLevel`], [`ActionState`]
//! - **Wire snapshots**: [`ActionRequest`], [`ActionStatus`], [`ActionRecord`],
//!   [`VaultService`], [`SpendingReport`]
//! - **Submission payloads**: [`ActionDraft`] and its per-category
//!   constructors
//! - **Content fingerprints**: [`fingerprint`] for verified
//!   ("what you see is what you sign") flows
//!
//! Everything here is pure data: no I/O, no clock, no network. The backend
//! owns all state; these types are immutable snapshots of it.
//!
//! # Example
//!
//! ```
//! use vouch_core::{ActionDraft, ActionType, RiskLevel};
//!
//! let draft = ActionDraft::email("john@company.com", "Quarterly report")
//!     .with_description("Q4 results attached");
//!
//! assert_eq!(draft.action_type, ActionType::Communication);
//! assert_eq!(draft.risk_level, RiskLevel::Low);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod action;
pub mod fingerprint;
pub mod types;

pub use action::ActionDraft;
pub use types::{
    ActionHistory, ActionRecord, ActionRequest, ActionState, ActionStatus, ActionType, RiskLevel,
    SpendingReport, SpendingSummary, VaultService,
};
