//! Submission payloads for action requests.
//!
//! [`ActionDraft`] is the body of a create-action call. Optional fields are
//! `Option` with `skip_serializing_if`, so an unset field is *omitted* from
//! the wire payload rather than sent as null - the backend distinguishes
//! absent from null.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{ActionType, RiskLevel};

/// Default expiry window for an action request, in seconds.
pub const DEFAULT_EXPIRES_IN_SECONDS: u64 = 300;

/// Default currency attached when an amount is set without one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// An action request payload, ready to submit for authorization.
#[derive(Debug, Clone, Serialize)]
pub struct ActionDraft {
    /// Category of the action.
    pub action_type: ActionType,
    /// Short summary shown to the human approver.
    pub title: String,
    /// Risk level shown to the approver.
    pub risk_level: RiskLevel,
    /// Whether the action can be undone.
    pub reversible: bool,
    /// Seconds until an unresolved request expires.
    pub expires_in_seconds: u64,
    /// Detailed explanation of the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Monetary amount, for actions that spend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Currency for `amount`; only meaningful alongside an amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Who or what receives the action (email address, merchant, host).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Free-form structured context shown with the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// URL the backend POSTs the resolution to, as a push alternative to
    /// polling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl ActionDraft {
    /// Create a draft with the category's default risk level, reversible,
    /// and the default expiry window.
    #[must_use]
    pub fn new(action_type: ActionType, title: impl Into<String>) -> Self {
        Self {
            action_type,
            title: title.into(),
            risk_level: action_type.default_risk_level(),
            reversible: true,
            expires_in_seconds: DEFAULT_EXPIRES_IN_SECONDS,
            description: None,
            amount: None,
            currency: None,
            recipient: None,
            metadata: None,
            callback_url: None,
        }
    }

    /// Request to send an email. Low risk by default.
    #[must_use]
    pub fn email(recipient: impl Into<String>, subject: impl AsRef<str>) -> Self {
        Self::new(
            ActionType::Communication,
            format!("Send email: {}", subject.as_ref()),
        )
        .with_recipient(recipient)
    }

    /// Request a purchase. Medium risk by default; the merchant is the
    /// recipient.
    #[must_use]
    pub fn purchase(merchant: impl AsRef<str>, amount: f64) -> Self {
        Self::new(
            ActionType::Purchase,
            format!("Purchase from {}", merchant.as_ref()),
        )
        .with_recipient(merchant.as_ref())
        .with_amount(amount)
    }

    /// Request a booking or calendar change. Low risk by default.
    #[must_use]
    pub fn booking(title: impl Into<String>) -> Self {
        Self::new(ActionType::Scheduling, title)
    }

    /// Request a social post. Medium risk by default; the content preview
    /// is what the approver reads.
    #[must_use]
    pub fn post(platform: impl AsRef<str>, content_preview: impl Into<String>) -> Self {
        Self::new(ActionType::Social, format!("Post to {}", platform.as_ref()))
            .with_description(content_preview)
    }

    /// Request access to a data resource. High risk by default.
    #[must_use]
    pub fn data_access(resource: impl AsRef<str>, reason: impl Into<String>) -> Self {
        Self::new(
            ActionType::DataAccess,
            format!("Access: {}", resource.as_ref()),
        )
        .with_description(reason)
    }

    /// Request to sign a contract or make a legal commitment.
    /// Critical risk and irreversible.
    #[must_use]
    pub fn contract(title: impl Into<String>, description: impl Into<String>) -> Self {
        let mut draft = Self::new(ActionType::Legal, title).with_description(description);
        draft.reversible = false;
        draft
    }

    /// Override the risk level.
    #[must_use]
    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Mark the action reversible or not.
    #[must_use]
    pub fn with_reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    /// Set the expiry window in seconds.
    #[must_use]
    pub fn with_expires_in(mut self, seconds: u64) -> Self {
        self.expires_in_seconds = seconds;
        self
    }

    /// Set the detailed description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the monetary amount. Fills in [`DEFAULT_CURRENCY`] unless a
    /// currency was already chosen.
    #[must_use]
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self.currency
            .get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
        self
    }

    /// Set the currency for the amount.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the recipient.
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Attach free-form metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set a callback URL for push notification of the resolution.
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }
}
