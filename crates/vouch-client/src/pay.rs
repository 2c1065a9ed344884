//! Purchase-only convenience wrapper.
//!
//! [`PayClient`] narrows the general client to the `purchase` category for
//! agents that only need payment authorization. It is pure composition: no
//! polling or error handling of its own, every call forwards to the inner
//! [`ApprovalClient`].

use std::time::Duration;

use serde_json::{Map, Value};

use vouch_core::{ActionDraft, ActionRequest, ActionStatus};

use crate::client::ApprovalClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// A payment to authorize.
#[derive(Debug, Clone)]
pub struct Payment {
    /// Amount to spend.
    pub amount: f64,
    /// Merchant receiving the payment.
    pub merchant: String,
    /// What the payment is for, shown to the approver.
    pub description: Option<String>,
    /// Currency override; defaults to USD.
    pub currency: Option<String>,
    /// Free-form context attached to the request.
    pub metadata: Option<Map<String, Value>>,
}

impl Payment {
    /// Describe a payment.
    #[must_use]
    pub fn new(amount: f64, merchant: impl Into<String>) -> Self {
        Self {
            amount,
            merchant: merchant.into(),
            description: None,
            currency: None,
            metadata: None,
        }
    }

    /// Describe what the payment is for.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Pay in a currency other than USD.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Attach metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn into_draft(self) -> ActionDraft {
        let mut draft = ActionDraft::purchase(&self.merchant, self.amount);
        if let Some(currency) = self.currency {
            draft = draft.with_currency(currency);
        }
        if let Some(description) = self.description {
            draft = draft.with_description(description);
        }
        if let Some(metadata) = self.metadata {
            draft = draft.with_metadata(metadata);
        }
        draft
    }
}

/// Payment-focused client. Every request it submits is a `purchase` action.
#[derive(Debug)]
pub struct PayClient {
    inner: ApprovalClient,
}

impl PayClient {
    /// Create a payment client from a configuration.
    ///
    /// # Errors
    ///
    /// Same construction failures as [`ApprovalClient::new`].
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            inner: ApprovalClient::new(config)?,
        })
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn from_client(inner: ApprovalClient) -> Self {
        Self { inner }
    }

    /// Request a payment. Returns immediately with the request id and
    /// initial status; the payment stays pending until the human approves
    /// on their device.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see
    /// [`ClientError`](crate::ClientError).
    pub async fn request_payment(&self, payment: Payment) -> ClientResult<ActionRequest> {
        self.inner.request_action(payment.into_draft()).await
    }

    /// Fetch the current status of a payment request.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; see
    /// [`ClientError`](crate::ClientError).
    pub async fn get_status(&self, request_id: &str) -> ClientResult<ActionStatus> {
        self.inner.get_status(request_id).await
    }

    /// Block until the payment is approved, denied, or expired, or until
    /// `timeout` elapses. Same contract as
    /// [`ApprovalClient::wait_for_result`], including the pending-after-
    /// timeout return.
    ///
    /// # Errors
    ///
    /// Only for failed status fetches; never for the timeout itself.
    pub async fn wait_for_result(
        &self,
        request_id: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> ClientResult<ActionStatus> {
        self.inner
            .wait_for_result(request_id, timeout, poll_interval)
            .await
    }
}
