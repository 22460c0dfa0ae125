//! End-user records that mirror the admin preferences.

use sqlx::{FromRow, SqlitePool};

use crate::document;
use crate::error::{map_unique, DatabaseError, Result};
use crate::models::{PreferenceField, UserAgent, UserMirror};

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    ai_preferences: Option<String>,
    story_preferences: Option<String>,
    agents: String,
    updated_at: String,
}

impl TryFrom<UserRow> for UserMirror {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(UserMirror {
            id: row.id,
            email: row.email,
            name: row.name,
            ai_preferences: document::decode_opt(row.ai_preferences)?,
            story_preferences: document::decode_opt(row.story_preferences)?,
            agents: document::decode_list(&row.agents)?,
            updated_at: row.updated_at,
        })
    }
}

/// Create a user record. Users are provisioned by the platform; this is
/// used for seeding and tests.
pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    email: &str,
    name: &str,
    agents: &[UserAgent],
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, agents)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(name)
    .bind(document::encode(&agents)?)
    .execute(pool)
    .await
    .map_err(map_unique("User", id))?;

    Ok(())
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<UserMirror> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, name, ai_preferences, story_preferences, agents, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })?
    .try_into()
}

/// Point lookup of a user's email.
pub async fn get_user_email(pool: &SqlitePool, id: &str) -> Result<Option<String>> {
    let email = sqlx::query_scalar::<_, String>(
        r#"
        SELECT email FROM users WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(email)
}

/// List every user.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserMirror>> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, name, ai_preferences, story_preferences, agents, updated_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(UserMirror::try_from).collect()
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Write one preference document onto every listed user in a single
/// transaction.
///
/// Either every user is updated or none is: a missing user or any failed
/// statement rolls the whole batch back.
pub async fn batch_set_preference_document(
    pool: &SqlitePool,
    user_ids: &[String],
    field: PreferenceField,
    document: &str,
) -> Result<u64> {
    let query = format!(
        r#"
        UPDATE users
        SET {column} = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
        column = field.column_name()
    );

    let mut tx = pool.begin().await?;
    let mut updated = 0;

    for user_id in user_ids {
        let result = sqlx::query(&query)
            .bind(document)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back earlier statements.
            return Err(DatabaseError::NotFound {
                entity: "User",
                id: user_id.clone(),
            });
        }
        updated += result.rows_affected();
    }

    tx.commit().await?;

    tracing::debug!(field = %field, updated, "Committed preference batch");
    Ok(updated)
}
