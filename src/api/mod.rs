//! REST API module.
//!
//! Contains all API routes and handlers for the lookup flow.

mod form;
mod search;
mod sessions;
mod slip;

pub use form::*;
pub use search::*;
pub use sessions::*;
pub use slip::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::controller::Session;
use crate::errors::AppError;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Look up a live session or fail with `SESSION_NOT_FOUND`.
async fn session(state: &AppState, id: &Uuid) -> Result<std::sync::Arc<Session>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::SessionNotFound(format!("Session {} not found", id)))
}
