//! Historical call records, stored per user.

use sqlx::{FromRow, SqlitePool};

use crate::document;
use crate::error::{map_unique, DatabaseError, Result};
use crate::models::CallRecord;

#[derive(FromRow)]
struct CallRow {
    id: String,
    user_id: String,
    category_id: Option<String>,
    started_at: String,
    ended_at: Option<String>,
    updated_at: String,
    transcript: String,
    turns: String,
    recording_url: Option<String>,
    video_url: Option<String>,
    session_id: Option<String>,
    story_id: Option<String>,
}

impl TryFrom<CallRow> for CallRecord {
    type Error = DatabaseError;

    fn try_from(row: CallRow) -> Result<Self> {
        Ok(CallRecord {
            id: row.id,
            user_id: row.user_id,
            category_id: row.category_id,
            started_at: row.started_at,
            ended_at: row.ended_at,
            updated_at: row.updated_at,
            transcript: row.transcript,
            turns: document::decode_list(&row.turns)?,
            recording_url: row.recording_url,
            video_url: row.video_url,
            session_id: row.session_id,
            story_id: row.story_id,
        })
    }
}

/// Insert a call record. Calls are written by the telephony pipeline; this
/// is used for imports and tests.
pub async fn insert_call(pool: &SqlitePool, call: &CallRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO calls (id, user_id, category_id, started_at, ended_at, updated_at,
                           transcript, turns, recording_url, video_url, session_id, story_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&call.id)
    .bind(&call.user_id)
    .bind(&call.category_id)
    .bind(&call.started_at)
    .bind(&call.ended_at)
    .bind(&call.updated_at)
    .bind(&call.transcript)
    .bind(document::encode(&call.turns)?)
    .bind(&call.recording_url)
    .bind(&call.video_url)
    .bind(&call.session_id)
    .bind(&call.story_id)
    .execute(pool)
    .await
    .map_err(map_unique("Call", &call.id))?;

    Ok(())
}

/// Get a single call belonging to a user.
pub async fn get_call(pool: &SqlitePool, user_id: &str, call_id: &str) -> Result<CallRecord> {
    sqlx::query_as::<_, CallRow>(
        r#"
        SELECT id, user_id, category_id, started_at, ended_at, updated_at,
               transcript, turns, recording_url, video_url, session_id, story_id
        FROM calls
        WHERE user_id = ? AND id = ?
        "#,
    )
    .bind(user_id)
    .bind(call_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Call",
        id: format!("{}/{}", user_id, call_id),
    })?
    .try_into()
}

/// List every call across all users, newest first. Ties on `updated_at`
/// are broken by user ID, then call ID.
pub async fn list_all_calls(pool: &SqlitePool) -> Result<Vec<CallRecord>> {
    let rows = sqlx::query_as::<_, CallRow>(
        r#"
        SELECT id, user_id, category_id, started_at, ended_at, updated_at,
               transcript, turns, recording_url, video_url, session_id, story_id
        FROM calls
        ORDER BY updated_at DESC, user_id, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(CallRecord::try_from).collect()
}
