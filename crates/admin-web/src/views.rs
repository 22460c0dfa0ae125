//! Read-and-edit views.
//!
//! Each editable screen moves through
//! `Loading -> Ready -> Saving -> Ready`, or `Loading -> Error` when its
//! documents cannot be fetched. A failed save returns to `Ready` with the
//! previous values and an error notice; nothing was changed locally before
//! the store confirmed.

use std::future::Future;

use axum::http::StatusCode;
use broadcaster::Notice;
use database::{
    admin, category, skeleton, AgentSkeleton, AiPreferences, Category, StoryPreferences, Voice,
};
use serde::Serialize;

use crate::error::{AdminError, Result};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Ready,
    Saving,
    Error,
}

/// A transition requested from a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {event} while {from:?}")]
pub struct InvalidTransition {
    pub from: ViewState,
    pub event: &'static str,
}

impl From<InvalidTransition> for AdminError {
    fn from(err: InvalidTransition) -> Self {
        AdminError::Internal(err.to_string())
    }
}

/// State of one editable screen.
#[derive(Debug, Clone, Serialize)]
pub struct EditView<T> {
    state: ViewState,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
    /// Where to re-issue the fetch from the error display.
    #[serde(skip_serializing_if = "Option::is_none")]
    retry: Option<String>,
}

impl<T> EditView<T> {
    pub fn loading() -> Self {
        Self {
            state: ViewState::Loading,
            data: None,
            notice: None,
            retry: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn require(
        &self,
        state: ViewState,
        event: &'static str,
    ) -> std::result::Result<(), InvalidTransition> {
        if self.state == state {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self.state,
                event,
            })
        }
    }

    /// `Loading -> Ready`. A notice may accompany degraded loads.
    pub fn loaded(
        mut self,
        data: T,
        notice: Option<Notice>,
    ) -> std::result::Result<Self, InvalidTransition> {
        self.require(ViewState::Loading, "finish loading")?;
        self.state = ViewState::Ready;
        self.data = Some(data);
        self.notice = notice;
        Ok(self)
    }

    /// `Loading -> Error`, remembering how to retry.
    pub fn load_failed(
        mut self,
        notice: Notice,
        retry: impl Into<String>,
    ) -> std::result::Result<Self, InvalidTransition> {
        self.require(ViewState::Loading, "fail loading")?;
        self.state = ViewState::Error;
        self.notice = Some(notice);
        self.retry = Some(retry.into());
        Ok(self)
    }

    /// `Error -> Loading`.
    pub fn retry(mut self) -> std::result::Result<Self, InvalidTransition> {
        self.require(ViewState::Error, "retry")?;
        self.state = ViewState::Loading;
        self.notice = None;
        self.retry = None;
        Ok(self)
    }

    /// `Ready -> Saving`. The current values stay in place until confirmed.
    pub fn begin_save(mut self) -> std::result::Result<Self, InvalidTransition> {
        self.require(ViewState::Ready, "save")?;
        self.state = ViewState::Saving;
        self.notice = None;
        Ok(self)
    }

    /// `Saving -> Ready` with the stored values.
    pub fn save_succeeded(
        mut self,
        saved: T,
        notice: Notice,
    ) -> std::result::Result<Self, InvalidTransition> {
        self.require(ViewState::Saving, "confirm save")?;
        self.state = ViewState::Ready;
        self.data = Some(saved);
        self.notice = Some(notice);
        Ok(self)
    }

    /// `Saving -> Ready` with the previous values and an error notice.
    pub fn save_failed(mut self, notice: Notice) -> std::result::Result<Self, InvalidTransition> {
        self.require(ViewState::Saving, "fail save")?;
        self.state = ViewState::Ready;
        self.notice = Some(notice);
        Ok(self)
    }
}

/// Run a screen's fetch and settle the view.
pub async fn load_view<T, F>(retry: &str, fetch: F) -> Result<(StatusCode, EditView<T>)>
where
    F: Future<Output = Result<(T, Option<Notice>)>>,
{
    let view = EditView::loading();
    match fetch.await {
        Ok((data, notice)) => Ok((StatusCode::OK, view.loaded(data, notice)?)),
        Err(err) => {
            err.log();
            let status = err.status();
            Ok((status, view.load_failed(err.notice(), retry)?))
        }
    }
}

/// Run a save against a ready view. The view keeps its old values on
/// failure.
pub async fn save_view<T, F>(view: EditView<T>, save: F) -> Result<(StatusCode, EditView<T>)>
where
    F: Future<Output = Result<(T, Notice)>>,
{
    let view = view.begin_save()?;
    match save.await {
        Ok((saved, notice)) => Ok((StatusCode::OK, view.save_succeeded(saved, notice)?)),
        Err(err) => {
            err.log();
            let status = err.status();
            Ok((status, view.save_failed(err.notice())?))
        }
    }
}

/// AI preferences screen.
#[derive(Debug, Clone, Serialize)]
pub struct AiPreferencesForm {
    pub preferences: AiPreferences,
    /// Whether the admin has saved AI preferences before.
    pub saved: bool,
    /// The voice catalog. Absent when only the admin record was loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voices: Option<Vec<Voice>>,
}

/// Story preferences screen.
#[derive(Debug, Clone, Serialize)]
pub struct StoryPreferencesForm {
    pub preferences: StoryPreferences,
    pub saved: bool,
}

/// Single-category prompt screen.
#[derive(Debug, Clone, Serialize)]
pub struct PromptForm {
    pub category: Category,
    pub skeleton: AgentSkeleton,
}

pub fn voice_from_catalog(voice: agent_provider::ProviderVoice) -> Voice {
    Voice {
        voice_id: voice.voice_id,
        voice_name: voice.voice_name,
        provider: voice.provider,
        accent: voice.accent,
        gender: voice.gender,
        age: voice.age,
        preview_audio_url: voice.preview_audio_url,
    }
}

/// Fetch the admin record alone, without the voice catalog.
pub async fn fetch_ai_record(
    state: &AppState,
    admin_id: &str,
) -> Result<(AiPreferencesForm, Option<Notice>)> {
    let admin = admin::get_admin(state.db.pool(), admin_id).await?;
    let form = AiPreferencesForm {
        preferences: admin.ai_preferences_or_default(),
        saved: admin.ai_preferences.is_some(),
        voices: None,
    };
    Ok((form, None))
}

/// Fetch the admin record and the voice catalog. A catalog outage still
/// yields a usable form with no voices to choose from.
pub async fn fetch_ai_form(
    state: &AppState,
    admin_id: &str,
) -> Result<(AiPreferencesForm, Option<Notice>)> {
    let (form, _) = fetch_ai_record(state, admin_id).await?;

    let (voices, notice) = match state.provider.list_voices().await {
        Ok(voices) => (voices.into_iter().map(voice_from_catalog).collect(), None),
        Err(err) => {
            tracing::warn!(error = %err, "Voice catalog unavailable");
            (
                Vec::new(),
                Some(AdminError::Provider(err).notice()),
            )
        }
    };

    let form = AiPreferencesForm {
        voices: Some(voices),
        ..form
    };
    Ok((form, notice))
}

pub async fn fetch_story_form(
    state: &AppState,
    admin_id: &str,
) -> Result<(StoryPreferencesForm, Option<Notice>)> {
    let admin = admin::get_admin(state.db.pool(), admin_id).await?;
    let form = StoryPreferencesForm {
        preferences: admin.story_preferences_or_default(),
        saved: admin.story_preferences.is_some(),
    };
    Ok((form, None))
}

pub async fn fetch_prompt_form(
    state: &AppState,
    skeleton_id: &str,
) -> Result<(PromptForm, Option<Notice>)> {
    let skeleton = skeleton::get_skeleton(state.db.pool(), skeleton_id).await?;
    let category = category::get_category(state.db.pool(), &skeleton.category_id).await?;
    Ok((PromptForm { category, skeleton }, None))
}
