//! The preference broadcast flow.

use std::sync::Arc;

use agent_provider::{AgentPatch, AgentProvider};
use database::{AiPreferences, PreferenceField, StoryPreferences};
use tracing::{info, warn};

use crate::error::BroadcastError;
use crate::fanout::{settle_all, RemoteCall, ResourceKind};
use crate::report::{BroadcastReport, FanOutSummary};
use crate::store::MirrorStore;

/// A fully specified preference value to broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceUpdate {
    Ai(AiPreferences),
    Story(StoryPreferences),
}

impl PreferenceUpdate {
    /// The block this value replaces on admin and user records.
    pub fn field(&self) -> PreferenceField {
        match self {
            PreferenceUpdate::Ai(_) => PreferenceField::Ai,
            PreferenceUpdate::Story(_) => PreferenceField::Story,
        }
    }

    fn to_document(&self) -> serde_json::Result<String> {
        match self {
            PreferenceUpdate::Ai(prefs) => serde_json::to_string(prefs),
            PreferenceUpdate::Story(prefs) => serde_json::to_string(prefs),
        }
    }

    /// Provider-side change for each user agent. Story preferences live only
    /// in the store.
    fn agent_patch(&self) -> Option<AgentPatch> {
        match self {
            PreferenceUpdate::Ai(prefs) => Some(AgentPatch::voice(prefs.voice.voice_id.clone())),
            PreferenceUpdate::Story(_) => None,
        }
    }
}

/// Saves a preference for the admin and reconciles every user and agent.
#[derive(Clone)]
pub struct PreferenceBroadcaster {
    store: Arc<dyn MirrorStore>,
    provider: Arc<dyn AgentProvider>,
}

impl PreferenceBroadcaster {
    pub fn new(store: Arc<dyn MirrorStore>, provider: Arc<dyn AgentProvider>) -> Self {
        Self { store, provider }
    }

    /// Save `update` on the admin record, push it to every user agent, then
    /// write it onto every user mirror in one batch.
    ///
    /// Provider failures are reported in the returned summary and never
    /// prevent the batch. The admin write always precedes the batch.
    pub async fn broadcast(
        &self,
        admin_id: &str,
        update: &PreferenceUpdate,
    ) -> Result<BroadcastReport, BroadcastError> {
        let field = update.field();
        let document = update.to_document()?;

        self.store
            .save_admin_preference(admin_id, field, &document)
            .await
            .map_err(BroadcastError::SaveAdmin)?;
        info!(admin_id, %field, "Saved admin preferences");

        let mirrors = self
            .store
            .list_mirrors()
            .await
            .map_err(BroadcastError::ListMirrors)?;

        let remote = match update.agent_patch() {
            Some(patch) => {
                let calls = mirrors
                    .iter()
                    .flat_map(|mirror| &mirror.agents)
                    .map(|agent| {
                        RemoteCall::new(
                            ResourceKind::Agent,
                            &agent.agent_id,
                            self.provider.update_agent(&agent.agent_id, &patch),
                        )
                    })
                    .collect();
                settle_all(calls).await
            }
            None => FanOutSummary::default(),
        };

        let user_ids: Vec<String> = mirrors.iter().map(|mirror| mirror.id.clone()).collect();
        let mirrors_updated = self
            .store
            .commit_mirror_batch(&user_ids, field, &document)
            .await
            .map_err(|source| BroadcastError::CommitMirrors {
                source,
                remote_calls: remote.calls,
                remote_failures: remote.failures.len(),
            })?;

        if remote.has_failures() {
            let failed: Vec<&str> = remote
                .failures
                .iter()
                .map(|failure| failure.resource_id.as_str())
                .collect();
            warn!(%field, ?failed, "Preferences saved but some agents were not updated");
        }

        info!(
            %field,
            mirrors_updated,
            remote_calls = remote.calls,
            remote_failures = remote.failures.len(),
            "Broadcast complete"
        );

        Ok(BroadcastReport {
            field,
            mirrors_updated,
            remote,
        })
    }
}
