//! Database models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An administrator of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Saved AI preference block, `None` until the first save.
    pub ai_preferences: Option<AiPreferences>,
    /// Saved story preference block, `None` until the first save.
    pub story_preferences: Option<StoryPreferences>,
    pub created_at: String,
    pub updated_at: String,
}

impl Admin {
    /// AI preferences, falling back to the fixed defaults before first save.
    pub fn ai_preferences_or_default(&self) -> AiPreferences {
        self.ai_preferences.clone().unwrap_or_default()
    }

    /// Story preferences, falling back to the fixed defaults before first save.
    pub fn story_preferences_or_default(&self) -> StoryPreferences {
        self.story_preferences.clone().unwrap_or_default()
    }
}

/// Fields needed to create an administrator.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A voice from the provider's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub voice_name: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_audio_url: Option<String>,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            voice_id: "11labs-Adrian".to_string(),
            voice_name: "Adrian".to_string(),
            provider: "elevenlabs".to_string(),
            accent: Some("American".to_string()),
            gender: Some("male".to_string()),
            age: Some("Young".to_string()),
            preview_audio_url: None,
        }
    }
}

/// How eagerly the agent asks follow-up questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpIntensity {
    Low,
    #[default]
    Medium,
    High,
}

/// Tone the agent uses in conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStyle {
    #[default]
    Friendly,
    Professional,
    Empathetic,
}

/// Global AI behavior chosen by the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiPreferences {
    pub voice: Voice,
    pub follow_up_intensity: FollowUpIntensity,
    pub conversation_style: ConversationStyle,
}

/// Point of view used when writing stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeStyle {
    #[default]
    FirstPerson,
    ThirdPerson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryLength {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    Minimal,
    #[default]
    Balanced,
    Rich,
}

/// Story generation preferences chosen by the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoryPreferences {
    pub narrative_style: NarrativeStyle,
    pub length: StoryLength,
    pub detail: DetailLevel,
}

/// Preference blocks that exist on both the admin record and user mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceField {
    Ai,
    Story,
}

impl PreferenceField {
    /// Column holding this block on `admins` and `users`.
    ///
    /// Column names cannot be bound as parameters, so queries interpolate
    /// this value. Only these fixed names ever reach SQL.
    pub fn column_name(&self) -> &'static str {
        match self {
            PreferenceField::Ai => "ai_preferences",
            PreferenceField::Story => "story_preferences",
        }
    }
}

impl fmt::Display for PreferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A provider-side agent owned by an end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgent {
    pub agent_id: String,
    pub llm_id: String,
    pub category_id: String,
}

/// A platform end user holding a copy of the admin preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMirror {
    pub id: String,
    pub email: String,
    pub name: String,
    pub ai_preferences: Option<AiPreferences>,
    pub story_preferences: Option<StoryPreferences>,
    #[serde(default)]
    pub agents: Vec<UserAgent>,
    pub updated_at: String,
}

/// Display metadata for a group of agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub description: String,
    pub emoji: String,
}

/// Per-category agent configuration edited from the prompts screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AgentSkeleton {
    pub id: String,
    pub category_id: String,
    /// BCP-47 tag such as `en-US`.
    pub language: String,
    /// 0.0 (never interrupted) to 1.0 (easily interrupted).
    pub interruption_sensitivity: f64,
    pub model: String,
    pub prompt: String,
    pub updated_at: String,
}

/// Editable fields of an agent skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonUpdate {
    pub language: String,
    pub interruption_sensitivity: f64,
    pub model: String,
    pub prompt: String,
}

/// Speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    Agent,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: TurnRole,
    pub content: String,
}

/// A finished call between an end user and one of their agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub updated_at: String,
    pub transcript: String,
    #[serde(default)]
    pub turns: Vec<TranscriptTurn>,
    pub recording_url: Option<String>,
    pub video_url: Option<String>,
    pub session_id: Option<String>,
    pub story_id: Option<String>,
}
