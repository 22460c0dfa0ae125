//! The store seam used by the broadcast flows.

use async_trait::async_trait;
use database::{
    admin, skeleton, user_mirror, AgentSkeleton, Database, DatabaseError, PreferenceField,
    SkeletonUpdate, UserMirror,
};

/// Document-store operations the broadcast flows rely on.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Overwrite one preference block on an admin record.
    async fn save_admin_preference(
        &self,
        admin_id: &str,
        field: PreferenceField,
        document: &str,
    ) -> Result<(), DatabaseError>;

    /// Every user mirror, unfiltered.
    async fn list_mirrors(&self) -> Result<Vec<UserMirror>, DatabaseError>;

    /// Write one preference block onto all listed users atomically.
    async fn commit_mirror_batch(
        &self,
        user_ids: &[String],
        field: PreferenceField,
        document: &str,
    ) -> Result<u64, DatabaseError>;

    /// Apply an edit to one agent skeleton.
    async fn update_skeleton(
        &self,
        skeleton_id: &str,
        update: &SkeletonUpdate,
    ) -> Result<AgentSkeleton, DatabaseError>;
}

#[async_trait]
impl MirrorStore for Database {
    async fn save_admin_preference(
        &self,
        admin_id: &str,
        field: PreferenceField,
        document: &str,
    ) -> Result<(), DatabaseError> {
        admin::set_preference_document(self.pool(), admin_id, field, document).await
    }

    async fn list_mirrors(&self) -> Result<Vec<UserMirror>, DatabaseError> {
        user_mirror::list_users(self.pool()).await
    }

    async fn commit_mirror_batch(
        &self,
        user_ids: &[String],
        field: PreferenceField,
        document: &str,
    ) -> Result<u64, DatabaseError> {
        user_mirror::batch_set_preference_document(self.pool(), user_ids, field, document).await
    }

    async fn update_skeleton(
        &self,
        skeleton_id: &str,
        update: &SkeletonUpdate,
    ) -> Result<AgentSkeleton, DatabaseError> {
        skeleton::update_skeleton(self.pool(), skeleton_id, update).await
    }
}
