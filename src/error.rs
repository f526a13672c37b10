/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / body)
 * - AuthError / RepoError を HTTP の意味に変換
 */
use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("validation failed")]
    Validation(BTreeMap<&'static str, String>),

    // Unknown user and wrong password are indistinguishable on the wire.
    #[error("{msg}", msg = INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Access Denied")]
    Forbidden,

    #[error("Unexpected error occurred")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            AppError::Validation(fields) => (status, Json(fields)).into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::PrincipalNotFound => {
                warn!("login rejected: principal not found");
                AppError::InvalidCredentials
            }
            AuthError::InvalidCredentials => {
                warn!("login rejected: password mismatch");
                AppError::InvalidCredentials
            }
            other @ AuthError::UnsupportedAuthType(_) => {
                AppError::InvalidRequest(other.to_string())
            }
            other => {
                error!(error = %other, "authentication collaborator failure");
                AppError::Internal
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict("email") => {
                AppError::InvalidRequest("Email already exists".into())
            }
            RepoError::Conflict(_) => AppError::InvalidRequest("Username already exists".into()),
            RepoError::Db(err) => {
                error!(error = %err, "directory failure");
                AppError::Internal
            }
        }
    }
}
