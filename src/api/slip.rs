//! Slip endpoints: printable page, PNG download, and share payload.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{session, success, ApiResult};
use crate::controller::Session;
use crate::errors::AppError;
use crate::models::VoterRecord;
use crate::slip::{export_file_name, SHARE_TITLE};
use crate::AppState;

/// The voter currently open in the session's detail view.
async fn selected_voter(session: &Session) -> Result<VoterRecord, AppError> {
    session
        .controller()
        .lock()
        .await
        .selected()
        .cloned()
        .ok_or_else(|| AppError::InvalidTransition("No voter is selected".to_string()))
}

/// Rasterize on the blocking pool, holding the session's export slot.
async fn export_png(
    state: &AppState,
    session: &Arc<Session>,
) -> Result<(VoterRecord, Vec<u8>), AppError> {
    let voter = selected_voter(session).await?;
    let _guard = session
        .try_begin_export()
        .ok_or(AppError::ExportInProgress)?;

    let renderer = Arc::clone(&state.renderer);
    let export_voter = voter.clone();
    let png = tokio::task::spawn_blocking(move || renderer.png(&export_voter))
        .await
        .map_err(|e| {
            tracing::error!("Slip export task failed: {e}");
            AppError::Internal("Slip export task failed".to_string())
        })??;

    tracing::info!(session = %session.id, bytes = png.len(), "Slip exported");
    Ok((voter, png))
}

/// GET /api/sessions/:id/slip - Printable slip page.
pub async fn slip_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let session = session(&state, &id).await?;
    let voter = selected_voter(&session).await?;
    Ok(Html(state.renderer.html(&voter)))
}

/// GET /api/sessions/:id/slip.png - Download the slip image.
pub async fn download_slip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = session(&state, &id).await?;
    let (voter, png) = export_png(&state, &session).await?;

    let disposition = format!("attachment; filename=\"{}\"", export_file_name(&voter));
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    /// Whether the client can share files natively.
    #[serde(default)]
    pub supported: bool,
}

/// File attachment for a native share sheet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub title: &'static str,
    pub file_name: String,
    pub mime_type: &'static str,
    /// Base64-encoded PNG.
    pub data: String,
}

/// GET /api/sessions/:id/slip/share - Slip image packaged for native sharing.
pub async fn share_slip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ShareQuery>,
) -> ApiResult<SharePayload> {
    let session = session(&state, &id).await?;
    if !query.supported {
        selected_voter(&session).await?;
        return Err(AppError::ShareUnsupported);
    }

    let (voter, png) = export_png(&state, &session).await?;
    success(SharePayload {
        title: SHARE_TITLE,
        file_name: export_file_name(&voter),
        mime_type: "image/png",
        data: STANDARD.encode(png),
    })
}
