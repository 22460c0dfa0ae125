//! AI and story preference screens, and the voice catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use broadcaster::PreferenceUpdate;
use database::{AiPreferences, StoryPreferences, ValidationError, Voice};

use crate::error::{AdminError, Result};
use crate::session::CurrentAdmin;
use crate::state::AppState;
use crate::views::{
    fetch_ai_form, fetch_ai_record, fetch_story_form, load_view, save_view, voice_from_catalog,
    AiPreferencesForm, EditView, StoryPreferencesForm, ViewState,
};

const AI_VIEW: &str = "/api/preferences/ai";
const STORY_VIEW: &str = "/api/preferences/story";

type ViewResponse<T> = Result<(StatusCode, Json<EditView<T>>)>;

pub async fn get_ai(
    State(state): State<AppState>,
    current: CurrentAdmin,
) -> ViewResponse<AiPreferencesForm> {
    let (status, view) = load_view(AI_VIEW, fetch_ai_form(&state, current.admin_id())).await?;
    Ok((status, Json(view)))
}

/// Save AI preferences and push them to every user and agent.
///
/// Only the admin record is loaded; the voice catalog is not consulted.
pub async fn put_ai(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Json(preferences): Json<AiPreferences>,
) -> ViewResponse<AiPreferencesForm> {
    if preferences.voice.voice_id.trim().is_empty() {
        return Err(ValidationError::Empty("voice".to_string()).into());
    }

    let (status, view) = load_view(AI_VIEW, fetch_ai_record(&state, current.admin_id())).await?;
    let Some(form) = view.data().cloned().filter(|_| view.state() == ViewState::Ready) else {
        return Ok((status, Json(view)));
    };

    let update = PreferenceUpdate::Ai(preferences.clone());
    let (status, view) = save_view(view, async {
        let report = state.broadcaster.broadcast(current.admin_id(), &update).await?;
        let saved = AiPreferencesForm {
            preferences,
            saved: true,
            ..form
        };
        Ok::<_, AdminError>((saved, report.notice()))
    })
    .await?;
    Ok((status, Json(view)))
}

pub async fn get_story(
    State(state): State<AppState>,
    current: CurrentAdmin,
) -> ViewResponse<StoryPreferencesForm> {
    let (status, view) = load_view(STORY_VIEW, fetch_story_form(&state, current.admin_id())).await?;
    Ok((status, Json(view)))
}

/// Save story preferences and copy them to every user.
pub async fn put_story(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Json(preferences): Json<StoryPreferences>,
) -> ViewResponse<StoryPreferencesForm> {
    let (status, view) = load_view(STORY_VIEW, fetch_story_form(&state, current.admin_id())).await?;
    if view.state() != ViewState::Ready {
        return Ok((status, Json(view)));
    }

    let update = PreferenceUpdate::Story(preferences.clone());
    let (status, view) = save_view(view, async {
        let report = state.broadcaster.broadcast(current.admin_id(), &update).await?;
        let saved = StoryPreferencesForm {
            preferences,
            saved: true,
        };
        Ok::<_, AdminError>((saved, report.notice()))
    })
    .await?;
    Ok((status, Json(view)))
}

/// The provider's voice catalog.
pub async fn list_voices(
    State(state): State<AppState>,
    _current: CurrentAdmin,
) -> Result<Json<Vec<Voice>>> {
    let voices = state.provider.list_voices().await?;
    Ok(Json(voices.into_iter().map(voice_from_catalog).collect()))
}
