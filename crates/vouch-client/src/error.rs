//! Error taxonomy for backend interactions.
//!
//! Every backend response maps to exactly one variant, so callers branch on
//! failure kind instead of inspecting raw HTTP status codes. The client
//! never swallows a failure; the one layer that converts errors into values
//! is the adapter boundary in `vouch-tools`.

use thiserror::Error;

/// Errors surfaced by the approval client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Generic non-2xx backend response (anything but 429).
    ///
    /// Recoverable: retry or surface to the user.
    #[error("backend error {status}: {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend-provided detail, or the raw response body.
        detail: String,
    },

    /// Rate limit exceeded (HTTP 429). Back off before retrying.
    #[error("rate limited: {detail}")]
    RateLimited {
        /// Parsed `Retry-After` header, when the backend sent one.
        retry_after_secs: Option<u64>,
        /// Backend-provided detail.
        detail: String,
    },

    /// The action reached terminal state `denied`.
    ///
    /// Not retryable for the same request; submit a new one if appropriate.
    #[error("action {request_id} denied: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Denied {
        /// The denied request.
        request_id: String,
        /// Reason supplied by the denier, if any.
        reason: Option<String>,
    },

    /// The action expired before resolution.
    #[error("action {request_id} expired before resolution")]
    Expired {
        /// The expired request.
        request_id: String,
    },

    /// The vault wait phase ended in a state other than `approved`, or the
    /// proxied execution itself failed.
    #[error("vault execution failed: {detail}")]
    VaultExecution {
        /// What went wrong.
        detail: String,
    },

    /// Caller-supplied structured parameters failed to parse. Reported
    /// before any network call.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Connection-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Missing or invalid configuration at construction time.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
