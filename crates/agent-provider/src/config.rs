//! Configuration types for agent-provider.

use std::time::Duration;

/// Default provider API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.retellai.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to the agent provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider API (no trailing slash).
    pub base_url: String,
    /// Static API key sent as a bearer token.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Create a configuration for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a configuration for a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// URL for updating one agent.
    pub fn update_agent_url(&self, agent_id: &str) -> String {
        format!(
            "{}/update-agent/{}",
            self.base_url,
            urlencoding::encode(agent_id)
        )
    }

    /// URL for updating one LLM.
    pub fn update_llm_url(&self, llm_id: &str) -> String {
        format!(
            "{}/update-retell-llm/{}",
            self.base_url,
            urlencoding::encode(llm_id)
        )
    }

    /// URL of the voice catalog.
    pub fn list_voices_url(&self) -> String {
        format!("{}/list-voices", self.base_url)
    }
}
