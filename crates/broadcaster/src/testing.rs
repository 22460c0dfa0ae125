//! In-memory store double for flow tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use database::{AgentSkeleton, DatabaseError, PreferenceField, SkeletonUpdate, UserAgent, UserMirror};

use crate::store::MirrorStore;

#[derive(Default)]
struct Inner {
    admins: HashSet<String>,
    admin_documents: HashMap<(String, PreferenceField), String>,
    mirrors: Vec<UserMirror>,
    skeletons: HashMap<String, AgentSkeleton>,
    operations: Vec<&'static str>,
    fail_batch: bool,
    fail_list: bool,
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    inner: Mutex<Inner>,
}

fn unavailable(what: &str) -> DatabaseError {
    DatabaseError::NotFound {
        entity: "Store",
        id: what.to_string(),
    }
}

impl MemoryStore {
    pub(crate) fn with_admin(admin_id: &str) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().admins.insert(admin_id.to_string());
        store
    }

    pub(crate) fn add_mirror(&self, id: &str, agents: Vec<UserAgent>) {
        self.inner.lock().unwrap().mirrors.push(UserMirror {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: id.to_string(),
            ai_preferences: None,
            story_preferences: None,
            agents,
            updated_at: String::new(),
        });
    }

    pub(crate) fn add_skeleton(&self, skeleton: AgentSkeleton) {
        self.inner
            .lock()
            .unwrap()
            .skeletons
            .insert(skeleton.id.clone(), skeleton);
    }

    pub(crate) fn fail_batch(&self) {
        self.inner.lock().unwrap().fail_batch = true;
    }

    pub(crate) fn fail_list(&self) {
        self.inner.lock().unwrap().fail_list = true;
    }

    pub(crate) fn admin_document(&self, admin_id: &str, field: PreferenceField) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .admin_documents
            .get(&(admin_id.to_string(), field))
            .cloned()
    }

    pub(crate) fn mirrors(&self) -> Vec<UserMirror> {
        self.inner.lock().unwrap().mirrors.clone()
    }

    pub(crate) fn operations(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().operations.clone()
    }
}

pub(crate) fn agent(id: &str, category: &str) -> UserAgent {
    UserAgent {
        agent_id: format!("agent_{}", id),
        llm_id: format!("llm_{}", id),
        category_id: category.to_string(),
    }
}

#[async_trait]
impl MirrorStore for MemoryStore {
    async fn save_admin_preference(
        &self,
        admin_id: &str,
        field: PreferenceField,
        document: &str,
    ) -> Result<(), DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push("save_admin");
        if !inner.admins.contains(admin_id) {
            return Err(DatabaseError::NotFound {
                entity: "Admin",
                id: admin_id.to_string(),
            });
        }
        inner
            .admin_documents
            .insert((admin_id.to_string(), field), document.to_string());
        Ok(())
    }

    async fn list_mirrors(&self) -> Result<Vec<UserMirror>, DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push("list_mirrors");
        if inner.fail_list {
            return Err(unavailable("users"));
        }
        Ok(inner.mirrors.clone())
    }

    async fn commit_mirror_batch(
        &self,
        user_ids: &[String],
        field: PreferenceField,
        document: &str,
    ) -> Result<u64, DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push("commit_batch");
        if inner.fail_batch {
            return Err(unavailable("batch"));
        }
        let mut updated = 0;
        for mirror in inner.mirrors.iter_mut() {
            if !user_ids.contains(&mirror.id) {
                continue;
            }
            match field {
                PreferenceField::Ai => mirror.ai_preferences = serde_json::from_str(document)?,
                PreferenceField::Story => {
                    mirror.story_preferences = serde_json::from_str(document)?
                }
            }
            updated += 1;
        }
        Ok(updated)
    }

    async fn update_skeleton(
        &self,
        skeleton_id: &str,
        update: &SkeletonUpdate,
    ) -> Result<AgentSkeleton, DatabaseError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push("update_skeleton");
        let skeleton = inner
            .skeletons
            .get_mut(skeleton_id)
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "AgentSkeleton",
                id: skeleton_id.to_string(),
            })?;
        skeleton.language = update.language.clone();
        skeleton.interruption_sensitivity = update.interruption_sensitivity;
        skeleton.model = update.model.clone();
        skeleton.prompt = update.prompt.clone();
        Ok(skeleton.clone())
    }
}
