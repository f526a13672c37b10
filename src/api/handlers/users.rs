/*
 * Responsibility
 * - /users 系 handler (principal の下流利用者)
 * - /users/me (GET/PUT) は認証済みなら誰でも
 * - /users (一覧), /users/create, DELETE /users/{username} は ADMIN のみ
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::auth::RegisterRequest;
use crate::api::dto::users::{CreatedUserResponse, MeResponse, UpdateProfileRequest, UserResponse};
use crate::api::extractors::CurrentPrincipal;
use crate::api::handlers::auth::create_principal;
use crate::error::AppError;
use crate::repos::Role;
use crate::state::AppState;

fn user_not_found(username: &str) -> AppError {
    AppError::InvalidRequest(format!("User not found with username: {username}"))
}

pub async fn me(current: CurrentPrincipal) -> Json<MeResponse> {
    Json(MeResponse::from(&current.0))
}

pub async fn update_me(
    current: CurrentPrincipal,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate()?;

    // 更新対象は token の subject のみ (他人の profile は触れない)
    let username = current.0.username();
    let row = state
        .directory
        .update_profile(username, req.into())
        .await?
        .ok_or_else(|| user_not_found(username))?;

    Ok(Json(UserResponse::from(row)))
}

pub async fn list_users(
    current: CurrentPrincipal,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    current.require_role(Role::Admin.as_str())?;

    let rows = state.directory.list().await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    current: CurrentPrincipal,
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<CreatedUserResponse>, AppError> {
    let admin = current.require_role(Role::Admin.as_str())?;
    let role = req.validate_for_admin()?;

    let created = create_principal(&state, req, role).await?;
    tracing::info!(admin = admin.username(), username = %created.username, "principal created by admin");

    Ok(Json(CreatedUserResponse {
        message: "User created successfully",
        data: UserResponse::from(created),
    }))
}

pub async fn delete_user(
    current: CurrentPrincipal,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    let admin = current.require_role(Role::Admin.as_str())?;

    if !state.directory.delete(&username).await? {
        return Err(user_not_found(&username));
    }
    tracing::info!(admin = admin.username(), username = %username, "principal deleted");

    Ok(StatusCode::NO_CONTENT)
}
