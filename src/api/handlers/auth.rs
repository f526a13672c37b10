/*
 * Responsibility
 * - POST /api/auth/login: DTO validation → dispatcher.login (strategy 選択) → token
 * - POST /api/auth/register: DTO validation → 重複チェック → hash → directory.create
 */
use std::sync::Arc;

use axum::{Json, extract::State};

use crate::api::dto::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::AppError;
use crate::repos::{NewPrincipal, PrincipalRecord, Role};
use crate::repos::error::RepoError;
use crate::services::auth::{AuthError, Credential};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate()?;

    let auth_type = req
        .auth_type()
        .unwrap_or(&*state.default_auth_type)
        .to_string();
    let credential = Credential::new(req.username, req.password);

    let issued = state.auth.login(&credential, &auth_type).await?;
    tracing::info!(username = %credential.username, auth_type = %auth_type, "login succeeded");

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<&'static str, AppError> {
    let role = req.validate()?;
    create_principal(&state, req, role).await?;

    Ok("User registered successfully")
}

/// 重複チェック → hash (blocking pool) → directory.create。register と admin 作成で共有。
pub(crate) async fn create_principal(
    state: &AppState,
    req: RegisterRequest,
    role: Role,
) -> Result<PrincipalRecord, AppError> {
    if state.directory.exists_by_username(&req.username).await? {
        return Err(RepoError::Conflict("username").into());
    }
    if state.directory.exists_by_email(&req.email).await? {
        return Err(RepoError::Conflict("email").into());
    }

    let verifier = Arc::clone(&state.verifier);
    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || verifier.hash(&password))
        .await
        .map_err(AuthError::from)?
        .map_err(AuthError::from)?;

    // 同時登録の競合は directory 側の一意制約で Conflict になる
    let created = state
        .directory
        .create(NewPrincipal {
            username: req.username,
            password_hash,
            email: req.email,
            name: req.name,
            role,
        })
        .await?;
    tracing::info!(username = %created.username, role = %created.role, "principal registered");

    Ok(created)
}
