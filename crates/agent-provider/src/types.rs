//! Request and response bodies for the provider API.

use serde::{Deserialize, Serialize};

/// Partial update of a provider agent. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interruption_sensitivity: Option<f64>,
}

impl AgentPatch {
    /// Patch that only changes the voice.
    pub fn voice(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: Some(voice_id.into()),
            ..Default::default()
        }
    }
}

/// Partial update of a provider LLM. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A voice as returned by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderVoice {
    pub voice_id: String,
    pub voice_name: String,
    pub provider: String,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub preview_audio_url: Option<String>,
}

/// Error body returned by the provider.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(alias = "error_message", alias = "error")]
    pub message: String,
}
