//! Administrator records.

use sqlx::{FromRow, SqlitePool};

use crate::document;
use crate::error::{map_unique, DatabaseError, Result};
use crate::models::{Admin, AiPreferences, NewAdmin, PreferenceField, StoryPreferences};

#[derive(FromRow)]
struct AdminRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    ai_preferences: Option<String>,
    story_preferences: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AdminRow> for Admin {
    type Error = DatabaseError;

    fn try_from(row: AdminRow) -> Result<Self> {
        Ok(Admin {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            ai_preferences: document::decode_opt(row.ai_preferences)?,
            story_preferences: document::decode_opt(row.story_preferences)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Create a new administrator with no saved preferences.
pub async fn create_admin(pool: &SqlitePool, admin: &NewAdmin) -> Result<Admin> {
    sqlx::query(
        r#"
        INSERT INTO admins (id, name, email, password_hash)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&admin.id)
    .bind(&admin.name)
    .bind(&admin.email)
    .bind(&admin.password_hash)
    .execute(pool)
    .await
    .map_err(map_unique("Admin", &admin.email))?;

    get_admin(pool, &admin.id).await
}

/// Get an administrator by ID.
pub async fn get_admin(pool: &SqlitePool, id: &str) -> Result<Admin> {
    sqlx::query_as::<_, AdminRow>(
        r#"
        SELECT id, name, email, password_hash, ai_preferences, story_preferences,
               created_at, updated_at
        FROM admins
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Admin",
        id: id.to_string(),
    })?
    .try_into()
}

/// Find an administrator by email, used at sign-in.
pub async fn find_admin_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Admin>> {
    let row = sqlx::query_as::<_, AdminRow>(
        r#"
        SELECT id, name, email, password_hash, ai_preferences, story_preferences,
               created_at, updated_at
        FROM admins
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(Admin::try_from).transpose()
}

/// Overwrite one preference block on the admin record and stamp `updated_at`.
pub async fn set_preference_document(
    pool: &SqlitePool,
    id: &str,
    field: PreferenceField,
    document: &str,
) -> Result<()> {
    let query = format!(
        r#"
        UPDATE admins
        SET {column} = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
        column = field.column_name()
    );

    let result = sqlx::query(&query)
        .bind(document)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Admin",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Save the admin's AI preferences.
pub async fn set_ai_preferences(pool: &SqlitePool, id: &str, prefs: &AiPreferences) -> Result<()> {
    let document = document::encode(prefs)?;
    set_preference_document(pool, id, PreferenceField::Ai, &document).await
}

/// Save the admin's story preferences.
pub async fn set_story_preferences(
    pool: &SqlitePool,
    id: &str,
    prefs: &StoryPreferences,
) -> Result<()> {
    let document = document::encode(prefs)?;
    set_preference_document(pool, id, PreferenceField::Story, &document).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConversationStyle, FollowUpIntensity, Voice};
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn new_admin(id: &str, email: &str) -> NewAdmin {
        NewAdmin {
            id: id.to_string(),
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_admin() {
        let db = test_db().await;
        let created = create_admin(db.pool(), &new_admin("a1", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(created.email, "ada@example.com");
        assert!(created.ai_preferences.is_none());
        assert!(created.story_preferences.is_none());

        let found = find_admin_by_email(db.pool(), "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "a1");
        assert!(find_admin_by_email(db.pool(), "nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        create_admin(db.pool(), &new_admin("a1", "ada@example.com"))
            .await
            .unwrap();
        let result = create_admin(db.pool(), &new_admin("a2", "ada@example.com")).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_set_preferences_round_trip() {
        let db = test_db().await;
        create_admin(db.pool(), &new_admin("a1", "ada@example.com"))
            .await
            .unwrap();

        let prefs = AiPreferences {
            voice: Voice {
                voice_id: "11labs-Myra".to_string(),
                voice_name: "Myra".to_string(),
                provider: "elevenlabs".to_string(),
                accent: None,
                gender: Some("female".to_string()),
                age: None,
                preview_audio_url: None,
            },
            follow_up_intensity: FollowUpIntensity::High,
            conversation_style: ConversationStyle::Empathetic,
        };
        set_ai_preferences(db.pool(), "a1", &prefs).await.unwrap();

        let admin = get_admin(db.pool(), "a1").await.unwrap();
        assert_eq!(admin.ai_preferences, Some(prefs));
        assert!(admin.story_preferences.is_none());
    }

    #[tokio::test]
    async fn test_set_preferences_missing_admin() {
        let db = test_db().await;
        let result = set_story_preferences(db.pool(), "ghost", &StoryPreferences::default()).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
