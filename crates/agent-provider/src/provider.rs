//! The `AgentProvider` trait.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{AgentPatch, LlmPatch, ProviderVoice};

/// Remote operations the dashboard performs against the agent provider.
///
/// The flow code holds one configured handle (`Arc<dyn AgentProvider>`) and
/// never builds clients per call. This trait is object-safe.
#[async_trait]
pub trait AgentProvider: Send + Sync {
    /// Apply a partial update to one agent.
    async fn update_agent(&self, agent_id: &str, patch: &AgentPatch) -> Result<(), ProviderError>;

    /// Apply a partial update to one LLM.
    async fn update_llm(&self, llm_id: &str, patch: &LlmPatch) -> Result<(), ProviderError>;

    /// Fetch the full voice catalog in one call.
    async fn list_voices(&self) -> Result<Vec<ProviderVoice>, ProviderError>;
}
