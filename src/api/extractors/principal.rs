use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthenticatedPrincipal;
use crate::state::AppState;

/// Handler で AuthenticatedPrincipal を受け取るための extractor
/// middleware が request.extensions() に insert 済みである前提
/// 見つからない場合は 401 (token なし / 無効 / principal 解決失敗)
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub AuthenticatedPrincipal);

impl CurrentPrincipal {
    /// 403 unless the principal holds `role`.
    pub fn require_role(&self, role: &str) -> Result<&AuthenticatedPrincipal, AppError> {
        if self.0.has_role(role) {
            Ok(&self.0)
        } else {
            tracing::debug!(username = self.0.username(), role, "access denied");
            Err(AppError::Forbidden)
        }
    }
}

impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AppError::Unauthorized)
    }
}
