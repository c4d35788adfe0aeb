//! Session endpoints driving the view controller.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::{session, success, ApiResult};
use crate::controller::ViewSnapshot;
use crate::errors::AppError;
use crate::models::SearchForm;
use crate::search::normalize;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub view: ViewSnapshot,
}

/// POST /api/sessions - Start a new idle session.
pub async fn create_session(State(state): State<AppState>) -> ApiResult<SessionView> {
    let session = state.sessions.create().await;
    let view = session.controller().lock().await.snapshot();
    success(SessionView {
        session_id: session.id,
        view,
    })
}

/// GET /api/sessions/:id - Current view state.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionView> {
    let session = session(&state, &id).await?;
    let view = session.controller().lock().await.snapshot();
    success(SessionView {
        session_id: id,
        view,
    })
}

/// POST /api/sessions/:id/search - Validate the form and run the search.
///
/// Validation failures leave the view untouched and never reach the directory.
pub async fn search_in_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<SearchForm>,
) -> ApiResult<SessionView> {
    let session = session(&state, &id).await?;
    let params = normalize(&form, state.config.ward_count).map_err(AppError::InvalidForm)?;

    let view = session
        .search(Arc::clone(&state.directory), params)
        .await?;
    success(SessionView {
        session_id: id,
        view,
    })
}

/// POST /api/sessions/:id/select/:voter_id - Open one voter's slip.
pub async fn select_voter(
    State(state): State<AppState>,
    Path((id, voter_id)): Path<(Uuid, String)>,
) -> ApiResult<SessionView> {
    let session = session(&state, &id).await?;
    let mut controller = session.controller().lock().await;
    controller.select(&voter_id)?;
    success(SessionView {
        session_id: id,
        view: controller.snapshot(),
    })
}

/// POST /api/sessions/:id/back - Return from the slip to the result list.
pub async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionView> {
    let session = session(&state, &id).await?;
    let mut controller = session.controller().lock().await;
    controller.back()?;
    success(SessionView {
        session_id: id,
        view: controller.snapshot(),
    })
}

/// POST /api/sessions/:id/reset - Clear results, errors, and selection.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionView> {
    let session = session(&state, &id).await?;
    let mut controller = session.controller().lock().await;
    controller.reset();
    success(SessionView {
        session_id: id,
        view: controller.snapshot(),
    })
}
