use std::sync::Arc;

use crate::services::auth::error::AuthError;
use crate::services::auth::principal::{AuthenticatedPrincipal, Credential};
use crate::services::auth::strategy::AuthenticationStrategy;
use crate::services::auth::token_codec::IssuedToken;

/// Single login entry point over a fixed, startup-registered set of strategies.
///
/// Selection is a linear scan in registration order; the first strategy whose
/// `supports` accepts the tag wins.
#[derive(Clone, Default)]
pub struct AuthenticationDispatcher {
    strategies: Vec<Arc<dyn AuthenticationStrategy>>,
}

impl std::fmt::Debug for AuthenticationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tags: Vec<&str> = self.strategies.iter().map(|s| s.auth_type()).collect();
        f.debug_struct("AuthenticationDispatcher")
            .field("strategies", &tags)
            .finish()
    }
}

impl AuthenticationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy. Returns `false` when an earlier strategy already claims
    /// the same tag; the new one is kept but is unreachable for that tag.
    pub fn register(&mut self, strategy: Arc<dyn AuthenticationStrategy>) -> bool {
        let shadowed = self.supports(strategy.auth_type());
        self.strategies.push(strategy);
        !shadowed
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn AuthenticationStrategy>) -> Self {
        self.register(strategy);
        self
    }

    pub fn auth_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.auth_type())
    }

    pub fn supports(&self, auth_type: &str) -> bool {
        self.find(auth_type).is_some()
    }

    fn find(&self, auth_type: &str) -> Option<&Arc<dyn AuthenticationStrategy>> {
        self.strategies.iter().find(|s| s.supports(auth_type))
    }

    fn select(&self, auth_type: &str) -> Result<&Arc<dyn AuthenticationStrategy>, AuthError> {
        self.find(auth_type)
            .ok_or_else(|| AuthError::UnsupportedAuthType(auth_type.to_string()))
    }

    pub async fn login(
        &self,
        credential: &Credential,
        auth_type: &str,
    ) -> Result<IssuedToken, AuthError> {
        self.select(auth_type)?.authenticate(credential).await
    }

    pub async fn load_principal(
        &self,
        auth_type: &str,
        username: &str,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        self.select(auth_type)?.load_principal(username).await
    }
}
