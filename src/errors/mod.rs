//! Error handling module for the voter slip service.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.
//! Every failure is turned into user-visible state here; nothing propagates as a crash.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::controller::{TransitionError, NETWORK_MESSAGE, NOT_FOUND_MESSAGE, SERVICE_MESSAGE};
use crate::directory::DirectoryError;
use crate::search::FieldErrors;
use crate::slip::RenderError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const SERVICE_ERROR: &str = "SERVICE_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const RENDER_EXPORT_ERROR: &str = "RENDER_EXPORT_ERROR";
    pub const SHARE_UNSUPPORTED: &str = "SHARE_UNSUPPORTED";
    pub const EXPORT_IN_PROGRESS: &str = "EXPORT_IN_PROGRESS";
    pub const SEARCH_IN_PROGRESS: &str = "SEARCH_IN_PROGRESS";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const SESSION_NOT_FOUND: &str = "SESSION_NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

pub const VALIDATION_MESSAGE: &str = "জন্ম তারিখ এবং ওয়ার্ড পূরণ করা বাধ্যতামূলক।";
pub const RENDER_EXPORT_MESSAGE: &str = "স্লিপ সংরক্ষণ করা যায়নি। দয়া করে আবার চেষ্টা করুন।";
pub const SHARE_UNSUPPORTED_MESSAGE: &str =
    "এই ডিভাইসে শেয়ার করা সমর্থিত নয়। অনুগ্রহ করে ডাউনলোড করুন।";
pub const EXPORT_IN_PROGRESS_MESSAGE: &str = "স্লিপ প্রসেস হচ্ছে...";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Incomplete date of birth or missing ward; no directory call was made
    InvalidForm(FieldErrors),
    /// Query succeeded but matched nothing, or the referenced voter is unknown
    NotFound(String),
    /// Directory answered with a failure
    Service(String),
    /// Directory unreachable
    Network(String),
    /// Slip rasterisation or encoding failed
    RenderExport(String),
    /// Client cannot share files natively
    ShareUnsupported,
    /// Another export for this session is still running
    ExportInProgress,
    /// Another search for this session is still running
    SearchInProgress,
    /// Action not valid in the current view state
    InvalidTransition(String),
    /// Unknown or expired session
    SessionNotFound(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Service(_) => StatusCode::BAD_GATEWAY,
            AppError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RenderExport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ShareUnsupported => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ExportInProgress => StatusCode::CONFLICT,
            AppError::SearchInProgress => StatusCode::CONFLICT,
            AppError::InvalidTransition(_) => StatusCode::CONFLICT,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidForm(_) => codes::VALIDATION_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Service(_) => codes::SERVICE_ERROR,
            AppError::Network(_) => codes::NETWORK_ERROR,
            AppError::RenderExport(_) => codes::RENDER_EXPORT_ERROR,
            AppError::ShareUnsupported => codes::SHARE_UNSUPPORTED,
            AppError::ExportInProgress => codes::EXPORT_IN_PROGRESS,
            AppError::SearchInProgress => codes::SEARCH_IN_PROGRESS,
            AppError::InvalidTransition(_) => codes::INVALID_TRANSITION,
            AppError::SessionNotFound(_) => codes::SESSION_NOT_FOUND,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidForm(_) => VALIDATION_MESSAGE.to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Service(msg) => msg.clone(),
            AppError::Network(msg) => msg.clone(),
            AppError::RenderExport(msg) => msg.clone(),
            AppError::ShareUnsupported => SHARE_UNSUPPORTED_MESSAGE.to_string(),
            AppError::ExportInProgress => EXPORT_IN_PROGRESS_MESSAGE.to_string(),
            AppError::SearchInProgress => "A search is already in progress".to_string(),
            AppError::InvalidTransition(msg) => msg.clone(),
            AppError::SessionNotFound(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    pub fn not_found() -> Self {
        AppError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        tracing::error!("Directory error: {:?}", err);
        match err {
            DirectoryError::Network(_) => AppError::Network(NETWORK_MESSAGE.to_string()),
            DirectoryError::Service(_) => AppError::Service(SERVICE_MESSAGE.to_string()),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        tracing::error!("Slip export error: {:?}", err);
        AppError::RenderExport(RENDER_EXPORT_MESSAGE.to_string())
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::SearchInProgress => AppError::SearchInProgress,
            TransitionError::UnknownVoter(_) => AppError::NotFound(err.to_string()),
            TransitionError::Invalid { .. } => AppError::InvalidTransition(err.to_string()),
        }
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let details = match error {
            AppError::InvalidForm(fields) => Some(serde_json::json!({ "fields": fields })),
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
