//! Agent skeletons: the per-category prompt and voice-agent settings.

use sqlx::SqlitePool;

use crate::error::{map_unique, DatabaseError, Result};
use crate::models::{AgentSkeleton, SkeletonUpdate};

/// Create an agent skeleton (seeding and tests).
pub async fn create_skeleton(pool: &SqlitePool, skeleton: &AgentSkeleton) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO agent_skeletons
            (id, category_id, language, interruption_sensitivity, model, prompt)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&skeleton.id)
    .bind(&skeleton.category_id)
    .bind(&skeleton.language)
    .bind(skeleton.interruption_sensitivity)
    .bind(&skeleton.model)
    .bind(&skeleton.prompt)
    .execute(pool)
    .await
    .map_err(map_unique("AgentSkeleton", &skeleton.id))?;

    Ok(())
}

/// Get a skeleton by ID.
pub async fn get_skeleton(pool: &SqlitePool, id: &str) -> Result<AgentSkeleton> {
    sqlx::query_as::<_, AgentSkeleton>(
        r#"
        SELECT id, category_id, language, interruption_sensitivity, model, prompt, updated_at
        FROM agent_skeletons
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "AgentSkeleton",
        id: id.to_string(),
    })
}

/// List all skeletons.
pub async fn list_skeletons(pool: &SqlitePool) -> Result<Vec<AgentSkeleton>> {
    let skeletons = sqlx::query_as::<_, AgentSkeleton>(
        r#"
        SELECT id, category_id, language, interruption_sensitivity, model, prompt, updated_at
        FROM agent_skeletons
        ORDER BY category_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(skeletons)
}

/// Apply an edit to a single skeleton and return the stored result.
pub async fn update_skeleton(
    pool: &SqlitePool,
    id: &str,
    update: &SkeletonUpdate,
) -> Result<AgentSkeleton> {
    let result = sqlx::query(
        r#"
        UPDATE agent_skeletons
        SET language = ?, interruption_sensitivity = ?, model = ?, prompt = ?,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&update.language)
    .bind(update.interruption_sensitivity)
    .bind(&update.model)
    .bind(&update.prompt)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "AgentSkeleton",
            id: id.to_string(),
        });
    }

    get_skeleton(pool, id).await
}
