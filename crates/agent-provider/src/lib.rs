//! Client library for the conversational-AI agent provider.
//!
//! The provider hosts two kinds of resources that the dashboard keeps in
//! sync with the saved admin preferences:
//!
//! - **agents**, which own voice, language and interruption settings
//! - **LLMs**, which own the behavior prompt and model
//!
//! It also serves the voice catalog that the AI preferences screen offers.
//!
//! # Example
//!
//! ```no_run
//! use agent_provider::{AgentPatch, AgentProvider, ProviderClient, ProviderConfig};
//!
//! # async fn example() -> Result<(), agent_provider::ProviderError> {
//! let client = ProviderClient::new(ProviderConfig::new("secret-key"))?;
//!
//! let voices = client.list_voices().await?;
//! println!("{} voices available", voices.len());
//!
//! client
//!     .update_agent("agent_123", &AgentPatch::voice("11labs-Adrian"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod provider;
pub mod types;

pub use client::ProviderClient;
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use mock::{ProviderCall, RecordingProvider};
pub use provider::AgentProvider;
pub use types::{AgentPatch, LlmPatch, ProviderVoice};

// Re-export async_trait for implementors
pub use async_trait::async_trait;
