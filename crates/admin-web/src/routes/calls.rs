//! Call history and the transcript viewer.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{call, user_mirror, CallRecord};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::history::{CallHistory, CallRow};
use crate::session::CurrentAdmin;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CallsQuery {
    /// Number of pages to show, starting at 1.
    #[serde(default = "default_pages")]
    pub pages: usize,
}

fn default_pages() -> usize {
    1
}

/// The visible window of the call history.
#[derive(Serialize)]
pub struct CallPage {
    pub calls: Vec<CallRow>,
    pub pages: usize,
    pub total: usize,
    pub has_more: bool,
}

impl From<&CallHistory> for CallPage {
    fn from(history: &CallHistory) -> Self {
        Self {
            calls: history.visible().to_vec(),
            pages: history.pages(),
            total: history.total(),
            has_more: history.has_more(),
        }
    }
}

/// List calls, newest first.
///
/// The first page reads the collection afresh. Later pages widen the
/// window this session already holds, so they show the same rows in the
/// same order even if calls arrived in between.
pub async fn list_calls(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Query(query): Query<CallsQuery>,
) -> Result<Json<CallPage>> {
    let cached = match query.pages {
        0 | 1 => None,
        _ => state.sessions.history(&current.token).await,
    };
    let mut history = match cached {
        Some(history) => history,
        None => CallHistory::load(&state.db).await?,
    };

    if history.pages() > query.pages {
        history = history.with_pages(query.pages);
    }
    while history.pages() < query.pages && history.has_more() {
        history.load_more();
    }

    let page = CallPage::from(&history);
    state.sessions.set_history(&current.token, history).await;
    Ok(Json(page))
}

/// A single call with its transcript and media links.
#[derive(Serialize)]
pub struct CallDetail {
    #[serde(flatten)]
    pub call: CallRecord,
    pub user_email: Option<String>,
}

pub async fn get_call(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Path((user_id, call_id)): Path<(String, String)>,
) -> Result<Json<CallDetail>> {
    let pool = state.db.pool();
    let call = call::get_call(pool, &user_id, &call_id).await?;
    let user_email = user_mirror::get_user_email(pool, &user_id).await?;
    Ok(Json(CallDetail { call, user_email }))
}
