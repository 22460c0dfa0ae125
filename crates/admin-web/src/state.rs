//! Application state shared across handlers.

use std::sync::Arc;

use agent_provider::AgentProvider;
use broadcaster::{PreferenceBroadcaster, PromptUpdater};
use database::Database;

use crate::session::SessionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Agent provider handle, shared by every flow.
    pub provider: Arc<dyn AgentProvider>,
    /// Preference save-and-reconcile flow.
    pub broadcaster: PreferenceBroadcaster,
    /// Prompt save-and-reconcile flow.
    pub prompts: PromptUpdater,
    /// Signed-in administrators.
    pub sessions: SessionStore,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, provider: Arc<dyn AgentProvider>) -> Self {
        let store = Arc::new(db.clone());
        Self {
            broadcaster: PreferenceBroadcaster::new(store.clone(), provider.clone()),
            prompts: PromptUpdater::new(store, provider.clone()),
            db,
            provider,
            sessions: SessionStore::new(),
        }
    }

    /// Replace the session store, e.g. to use a configured TTL.
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }
}
