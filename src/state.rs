/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - dispatcher (login), token codec, principal directory, credential verifier
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエスト間で共有されるのは不変の値だけ (署名鍵を含む)
 */
use std::sync::Arc;

use crate::repos::PrincipalDirectory;
use crate::services::auth::{AuthenticationDispatcher, TokenCodec};
use crate::services::password::CredentialVerifier;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthenticationDispatcher>,
    pub codec: Arc<TokenCodec>,
    pub directory: Arc<dyn PrincipalDirectory>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub default_auth_type: Arc<str>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .field("codec", &self.codec)
            .field("default_auth_type", &self.default_auth_type)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        auth: Arc<AuthenticationDispatcher>,
        codec: Arc<TokenCodec>,
        directory: Arc<dyn PrincipalDirectory>,
        verifier: Arc<dyn CredentialVerifier>,
        default_auth_type: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            auth,
            codec,
            directory,
            verifier,
            default_auth_type: default_auth_type.into(),
        }
    }
}
