//! Per-category agent prompts.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::validation::{
    validate_interruption_sensitivity, validate_model_length, validate_prompt,
};
use database::{category, skeleton, AgentSkeleton, Category, SkeletonUpdate, ValidationError};
use serde::Serialize;

use crate::error::{AdminError, Result};
use crate::session::CurrentAdmin;
use crate::state::AppState;
use crate::views::{fetch_prompt_form, load_view, save_view, EditView, PromptForm, ViewState};

/// One entry of the prompt list.
#[derive(Serialize)]
pub struct PromptSummary {
    pub skeleton: AgentSkeleton,
    /// `None` if the skeleton points at an unknown category.
    pub category: Option<Category>,
}

/// List every skeleton with its category.
pub async fn list_prompts(
    State(state): State<AppState>,
    _current: CurrentAdmin,
) -> Result<Json<Vec<PromptSummary>>> {
    let pool = state.db.pool();
    let categories: HashMap<String, Category> = category::list_categories(pool)
        .await?
        .into_iter()
        .map(|category| (category.id.clone(), category))
        .collect();

    let prompts = skeleton::list_skeletons(pool)
        .await?
        .into_iter()
        .map(|skeleton| PromptSummary {
            category: categories.get(&skeleton.category_id).cloned(),
            skeleton,
        })
        .collect();

    Ok(Json(prompts))
}

pub async fn get_prompt(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Path(skeleton_id): Path<String>,
) -> Result<(StatusCode, Json<EditView<PromptForm>>)> {
    let retry = format!("/api/prompts/{}", skeleton_id);
    let (status, view) = load_view(&retry, fetch_prompt_form(&state, &skeleton_id)).await?;
    Ok((status, Json(view)))
}

fn validate_update(update: &SkeletonUpdate) -> std::result::Result<(), ValidationError> {
    if update.language.trim().is_empty() {
        return Err(ValidationError::Empty("language".to_string()));
    }
    if update.model.trim().is_empty() {
        return Err(ValidationError::Empty("model".to_string()));
    }
    validate_model_length(&update.model)?;
    validate_prompt(&update.prompt)?;
    validate_interruption_sensitivity(update.interruption_sensitivity)
}

/// Save one skeleton and reconcile every agent in its category.
pub async fn put_prompt(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Path(skeleton_id): Path<String>,
    Json(update): Json<SkeletonUpdate>,
) -> Result<(StatusCode, Json<EditView<PromptForm>>)> {
    validate_update(&update)?;

    let retry = format!("/api/prompts/{}", skeleton_id);
    let (status, view) = load_view(&retry, fetch_prompt_form(&state, &skeleton_id)).await?;
    let Some(form) = view.data().cloned().filter(|_| view.state() == ViewState::Ready) else {
        return Ok((status, Json(view)));
    };

    let (status, view) = save_view(view, async {
        let report = state.prompts.update_prompt(&skeleton_id, &update).await?;
        let notice = report.notice();
        let saved = PromptForm {
            skeleton: report.skeleton,
            ..form
        };
        Ok::<_, AdminError>((saved, notice))
    })
    .await?;
    Ok((status, Json(view)))
}
