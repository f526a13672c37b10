//! Bearer token → AuthenticatedPrincipal を request extensions に入れる
//!
//! 1リクエスト1回、次の順で評価して必ず next に渡す (ここでは拒否しない):
//! - `Authorization: Bearer <token>` がなければ素通し
//! - token から subject を取り出せなければ素通し (malformed は無視)
//! - 既に principal が付与済みなら上書きしない
//! - 署名 + subject + exp の検証に失敗したら素通し
//! - 成功したら strategy 経由で principal を解決し extensions に格納
//!
//! principal の有無による認可は handler 側 (extractor / role check) で fail-closed に行う。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};
use chrono::Utc;

use crate::services::auth::AuthenticatedPrincipal;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// How a request left the interceptor. Every variant means "continue to the handler".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoBearer,
    MalformedToken,
    AlreadyAuthenticated,
    InvalidToken,
    PrincipalUnavailable,
    Authenticated,
}

/// 全ルートに認証 middleware を適用する。
///
/// 例：
/// ```ignore
/// let router = api::routes();
/// let router = middleware::auth::access::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let outcome = authenticate(&state, &mut req).await;
    tracing::debug!(?outcome, path = %req.uri().path(), "bearer authentication");

    next.run(req).await
}

pub async fn authenticate(state: &AppState, req: &mut Request<Body>) -> Outcome {
    let Some(token) = bearer_token(req) else {
        return Outcome::NoBearer;
    };

    let subject = match state.codec.extract_subject(&token) {
        Ok(subject) => subject,
        Err(_) => return Outcome::MalformedToken,
    };

    if req.extensions().get::<AuthenticatedPrincipal>().is_some() {
        return Outcome::AlreadyAuthenticated;
    }

    // Validation gates principal resolution.
    if let Err(err) = state.codec.verify(&token, &subject, Utc::now()) {
        tracing::debug!(error = %err, "bearer token rejected");
        return Outcome::InvalidToken;
    }

    let principal = match state
        .auth
        .load_principal(&state.default_auth_type, &subject)
        .await
    {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(error = %err, "principal resolution failed for a valid token");
            return Outcome::PrincipalUnavailable;
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(principal);
    Outcome::Authenticated
}

fn bearer_token(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .map(str::to_string)
}
