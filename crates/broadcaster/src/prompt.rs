//! Saving a category prompt and pushing it to every matching agent.

use std::sync::Arc;

use agent_provider::{AgentPatch, AgentProvider, LlmPatch};
use database::SkeletonUpdate;
use tracing::{info, warn};

use crate::error::BroadcastError;
use crate::fanout::{settle_all, RemoteCall, ResourceKind};
use crate::report::PromptReport;
use crate::store::MirrorStore;

/// Updates one agent skeleton and reconciles the agents built from it.
#[derive(Clone)]
pub struct PromptUpdater {
    store: Arc<dyn MirrorStore>,
    provider: Arc<dyn AgentProvider>,
}

impl PromptUpdater {
    pub fn new(store: Arc<dyn MirrorStore>, provider: Arc<dyn AgentProvider>) -> Self {
        Self { store, provider }
    }

    /// Save the skeleton, then update every user agent in the same category:
    /// the agent gets language and interruption sensitivity, its LLM gets the
    /// prompt and model. Provider failures are collected, not raised.
    pub async fn update_prompt(
        &self,
        skeleton_id: &str,
        update: &SkeletonUpdate,
    ) -> Result<PromptReport, BroadcastError> {
        let skeleton = self
            .store
            .update_skeleton(skeleton_id, update)
            .await
            .map_err(BroadcastError::SaveSkeleton)?;
        info!(skeleton_id, category_id = %skeleton.category_id, "Saved agent skeleton");

        let mirrors = self
            .store
            .list_mirrors()
            .await
            .map_err(BroadcastError::ListPromptAgents)?;

        let agent_patch = AgentPatch {
            voice_id: None,
            language: Some(skeleton.language.clone()),
            interruption_sensitivity: Some(skeleton.interruption_sensitivity),
        };
        let llm_patch = LlmPatch {
            general_prompt: Some(skeleton.prompt.clone()),
            model: Some(skeleton.model.clone()),
        };

        let calls = mirrors
            .iter()
            .flat_map(|mirror| &mirror.agents)
            .filter(|agent| agent.category_id == skeleton.category_id)
            .flat_map(|agent| {
                [
                    RemoteCall::new(
                        ResourceKind::Agent,
                        &agent.agent_id,
                        self.provider.update_agent(&agent.agent_id, &agent_patch),
                    ),
                    RemoteCall::new(
                        ResourceKind::Llm,
                        &agent.llm_id,
                        self.provider.update_llm(&agent.llm_id, &llm_patch),
                    ),
                ]
            })
            .collect();
        let remote = settle_all(calls).await;

        if remote.has_failures() {
            let failed: Vec<&str> = remote
                .failures
                .iter()
                .map(|failure| failure.resource_id.as_str())
                .collect();
            warn!(skeleton_id, ?failed, "Prompt saved but some agents were not updated");
        }

        info!(
            skeleton_id,
            remote_calls = remote.calls,
            remote_failures = remote.failures.len(),
            "Prompt update complete"
        );

        Ok(PromptReport { skeleton, remote })
    }
}
