/*
 * Responsibility
 * - /api 配下の URL 構造を定義
 * - 認可 (principal 必須 / role 必須) は handler 側の extractor で行う
 */
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::handlers::{
    auth::{login, register},
    users::{create_user, delete_user, list_users, me, update_me},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/users", get(list_users))
        .route("/users/me", get(me).put(update_me))
        .route("/users/create", post(create_user))
        .route("/users/{username}", delete(delete_user))
}
