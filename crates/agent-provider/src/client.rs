//! HTTP client for the agent provider.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::provider::AgentProvider;
use crate::types::{AgentPatch, ApiErrorBody, LlmPatch, ProviderVoice};

/// Client for the provider's REST API.
#[derive(Clone)]
pub struct ProviderClient {
    http: Client,
    config: ProviderConfig,
}

impl ProviderClient {
    /// Build a client. No request is made until the first call.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::Config("API key is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::Http)?;

        info!(base_url = %config.base_url, "Agent provider client ready");

        Ok(Self { http, config })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn patch<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<(), ProviderError> {
        debug!(url, "PATCH");

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-success response into `ProviderError::Api`.
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&error_text) {
        Ok(body) => body.message,
        Err(_) => error_text,
    };

    Err(ProviderError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl AgentProvider for ProviderClient {
    async fn update_agent(&self, agent_id: &str, patch: &AgentPatch) -> Result<(), ProviderError> {
        let url = self.config.update_agent_url(agent_id);
        self.patch(&url, patch).await
    }

    async fn update_llm(&self, llm_id: &str, patch: &LlmPatch) -> Result<(), ProviderError> {
        let url = self.config.update_llm_url(llm_id);
        self.patch(&url, patch).await
    }

    async fn list_voices(&self) -> Result<Vec<ProviderVoice>, ProviderError> {
        let url = self.config.list_voices_url();
        debug!(url = %url, "GET");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let voices = check_status(response).await?.json().await?;
        Ok(voices)
    }
}
