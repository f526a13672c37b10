use async_trait::async_trait;

use crate::services::auth::error::AuthError;
use crate::services::auth::principal::{AuthenticatedPrincipal, Credential};
use crate::services::auth::token_codec::IssuedToken;

/// One credential-verification method, selected by an auth-type tag (e.g. "LOCAL").
///
/// New methods are added by implementing this trait and registering the
/// implementation with the dispatcher; neither the dispatcher nor the
/// request middleware change.
#[async_trait]
pub trait AuthenticationStrategy: Send + Sync + 'static {
    /// Canonical tag, also used for duplicate detection at registration.
    fn auth_type(&self) -> &'static str;

    fn supports(&self, auth_type: &str) -> bool {
        self.auth_type().eq_ignore_ascii_case(auth_type)
    }

    async fn authenticate(&self, credential: &Credential) -> Result<IssuedToken, AuthError>;

    async fn load_principal(&self, username: &str) -> Result<AuthenticatedPrincipal, AuthError>;
}
