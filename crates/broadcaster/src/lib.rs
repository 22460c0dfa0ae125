//! Preference broadcast utilities for the storyteller dashboard.
//!
//! Saving a global preference touches three places: the administrator's own
//! record, every end user's mirrored copy, and every provider-side agent
//! those users own. This crate performs that save with the following
//! guarantees:
//!
//! - the admin record is written first; if that fails nothing else happens
//! - provider updates run concurrently and all of them settle; failures are
//!   collected, logged, and never abort the save
//! - the user mirrors are written in one all-or-nothing batch, whatever the
//!   provider outcome
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use agent_provider::{ProviderClient, ProviderConfig};
//! use broadcaster::{PreferenceBroadcaster, PreferenceUpdate};
//! use database::{AiPreferences, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:storyteller.db?mode=rwc").await?;
//! let provider = ProviderClient::new(ProviderConfig::new("secret-key"))?;
//! let broadcaster = PreferenceBroadcaster::new(Arc::new(db), Arc::new(provider));
//!
//! let report = broadcaster
//!     .broadcast("admin-id", &PreferenceUpdate::Ai(AiPreferences::default()))
//!     .await?;
//! println!("{}", report.notice().message);
//! # Ok(())
//! # }
//! ```

mod error;
mod fanout;
mod flow;
mod prompt;
mod report;
mod store;

pub use error::BroadcastError;
pub use fanout::{RemoteFailure, ResourceKind};
pub use flow::{PreferenceBroadcaster, PreferenceUpdate};
pub use prompt::PromptUpdater;
pub use report::{BroadcastReport, FanOutSummary, Notice, NoticeLevel, PromptReport};
pub use store::MirrorStore;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod testing;
