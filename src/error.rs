//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` for every failure a service can report and implements
//! Axum's `IntoResponse` so handlers can return it directly as a JSON
//! `{"error": ...}` body.
//!
//! Error mappings:
//! - `Configuration`, `Authorization` → 401
//! - `Upstream` → the upstream status, passed through
//! - `Internal` → 500

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::github::UpstreamError;

/// Which upstream endpoint produced an error; only changes the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Commits,
    Search,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Commits => f.write_str("GitHub API"),
            Endpoint::Search => f.write_str("GitHub Search API"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("GitHub token not configured.")]
    Configuration,

    #[error("GitHub authorization error.")]
    Authorization,

    #[error("{endpoint} error: {status} - {reason}")]
    Upstream {
        endpoint: Endpoint,
        status: u16,
        reason: String,
    },

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn from_upstream(err: UpstreamError, endpoint: Endpoint) -> Self {
        match err {
            UpstreamError::Status { status: 401, .. } => AppError::Authorization,
            UpstreamError::Status { status, reason } => AppError::Upstream {
                endpoint,
                status,
                reason,
            },
            UpstreamError::Transport(msg) | UpstreamError::Decode(msg) => AppError::Internal(msg),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration | AppError::Authorization => StatusCode::UNAUTHORIZED,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
