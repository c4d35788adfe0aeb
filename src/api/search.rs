//! Stateless lookup endpoint.

use axum::extract::{Query, State};
use serde::Serialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{SearchForm, VoterRecord};
use crate::search::{normalize, run_search};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub count: usize,
    pub voters: Vec<VoterRecord>,
}

/// GET /api/search - One-shot lookup without a session.
pub async fn search_voters(
    State(state): State<AppState>,
    Query(form): Query<SearchForm>,
) -> ApiResult<LookupResponse> {
    let params = normalize(&form, state.config.ward_count).map_err(AppError::InvalidForm)?;

    let voters = run_search(state.directory.as_ref(), &params).await?;
    if voters.is_empty() {
        return Err(AppError::not_found());
    }

    success(LookupResponse {
        count: voters.len(),
        voters,
    })
}
