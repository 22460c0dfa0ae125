//! An in-memory provider that records calls.
//!
//! Used by tests across the workspace. Failures can be scripted per
//! resource ID.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ProviderError;
use crate::provider::AgentProvider;
use crate::types::{AgentPatch, LlmPatch, ProviderVoice};

/// A call received by [`RecordingProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    UpdateAgent { agent_id: String, patch: AgentPatch },
    UpdateLlm { llm_id: String, patch: LlmPatch },
    ListVoices,
}

#[derive(Default)]
struct Inner {
    calls: Vec<ProviderCall>,
    failing: HashSet<String>,
    voices: Vec<ProviderVoice>,
    catalog_unavailable: bool,
}

/// Provider double that records every call and fails on request.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this catalog from `list_voices`.
    pub fn with_voices(voices: Vec<ProviderVoice>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                voices,
                ..Default::default()
            })),
        }
    }

    /// Make every update to this agent or LLM ID fail.
    pub async fn fail_resource(&self, resource_id: impl Into<String>) {
        self.inner.lock().await.failing.insert(resource_id.into());
    }

    /// Make `list_voices` fail.
    pub async fn fail_catalog(&self) {
        self.inner.lock().await.catalog_unavailable = true;
    }

    /// All calls received so far, in arrival order.
    pub async fn calls(&self) -> Vec<ProviderCall> {
        self.inner.lock().await.calls.clone()
    }

    /// Number of update calls received so far.
    pub async fn update_count(&self) -> usize {
        self.inner
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| !matches!(call, ProviderCall::ListVoices))
            .count()
    }
}

fn scripted_failure(resource_id: &str) -> ProviderError {
    ProviderError::Api {
        status: 500,
        message: format!("scripted failure for {}", resource_id),
    }
}

#[async_trait]
impl AgentProvider for RecordingProvider {
    async fn update_agent(&self, agent_id: &str, patch: &AgentPatch) -> Result<(), ProviderError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ProviderCall::UpdateAgent {
            agent_id: agent_id.to_string(),
            patch: patch.clone(),
        });
        if inner.failing.contains(agent_id) {
            return Err(scripted_failure(agent_id));
        }
        Ok(())
    }

    async fn update_llm(&self, llm_id: &str, patch: &LlmPatch) -> Result<(), ProviderError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ProviderCall::UpdateLlm {
            llm_id: llm_id.to_string(),
            patch: patch.clone(),
        });
        if inner.failing.contains(llm_id) {
            return Err(scripted_failure(llm_id));
        }
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<ProviderVoice>, ProviderError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ProviderCall::ListVoices);
        if inner.catalog_unavailable {
            return Err(scripted_failure("voice catalog"));
        }
        Ok(inner.voices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_and_scripted_failures() {
        let provider = RecordingProvider::new();
        provider.fail_resource("llm_bad").await;

        provider
            .update_agent("agent_1", &AgentPatch::voice("v1"))
            .await
            .unwrap();
        let result = provider.update_llm("llm_bad", &LlmPatch::default()).await;
        assert!(matches!(result, Err(ProviderError::Api { status: 500, .. })));

        assert_eq!(provider.update_count().await, 2);
        assert_eq!(
            provider.calls().await[0],
            ProviderCall::UpdateAgent {
                agent_id: "agent_1".to_string(),
                patch: AgentPatch::voice("v1"),
            }
        );
    }

    #[tokio::test]
    async fn test_catalog() {
        let voice = ProviderVoice {
            voice_id: "openai-Alloy".to_string(),
            voice_name: "Alloy".to_string(),
            provider: "openai".to_string(),
            accent: None,
            gender: None,
            age: None,
            preview_audio_url: None,
        };
        let provider = RecordingProvider::with_voices(vec![voice.clone()]);
        assert_eq!(provider.list_voices().await.unwrap(), vec![voice]);

        provider.fail_catalog().await;
        assert!(provider.list_voices().await.is_err());
    }
}
