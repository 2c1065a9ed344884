//! Vouch Client - request human authorization before an agent acts.
//!
//! Agents submit action requests to a remote approval backend; a human
//! approves or denies on a paired device (biometric or TOTP), and the agent
//! polls for the resolution. All state lives in the backend - this client
//! holds only a connection and a configuration, never a cache.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use vouch_client::prelude::*;
//!
//! # async fn example() -> ClientResult<()> {
//! let client = ApprovalClient::new(ClientConfig::new("aa_your_key"))?;
//!
//! let created = client
//!     .request_action(
//!         ActionDraft::email("john@company.com", "Quarterly report")
//!             .with_description("Q4 results attached"),
//!     )
//!     .await?;
//!
//! // The rules engine may have resolved the request already.
//! let resolution = if created.status.is_terminal() {
//!     client.get_status(&created.id).await?
//! } else {
//!     client
//!         .wait_for_result(&created.id, Duration::from_secs(300), Duration::from_secs(2))
//!         .await?
//! };
//!
//! if resolution.status == ActionState::Approved {
//!     // send the email
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod client;
pub mod config;
pub mod error;
pub mod pay;
pub mod prelude;
pub mod vault;

pub use client::{ApprovalClient, HistoryFilter};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use pay::{PayClient, Payment};
pub use vault::VaultCall;
