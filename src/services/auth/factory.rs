/// Factory: build the token codec and the strategy set from application `Config`.
use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;
use crate::repos::PrincipalDirectory;
use crate::services::auth::{
    AuthenticationDispatcher, AuthenticationStrategy, LocalAuthenticationStrategy, TokenCodec,
};
use crate::services::password::{CredentialVerifier, VerifierError};

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error(transparent)]
    Verifier(#[from] VerifierError),
    #[error("no authentication strategy registered for default auth type {0:?}")]
    DefaultAuthTypeUnsupported(String),
    #[error("access token ttl out of range: {0}s")]
    TokenTtlOutOfRange(u64),
}

pub fn build_token_codec(config: &Config) -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(config.jwt_secret.as_bytes()))
}

pub fn build_dispatcher(
    config: &Config,
    codec: Arc<TokenCodec>,
    directory: Arc<dyn PrincipalDirectory>,
    verifier: Arc<dyn CredentialVerifier>,
) -> Result<Arc<AuthenticationDispatcher>, FactoryError> {
    let ttl = i64::try_from(config.access_token_ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(FactoryError::TokenTtlOutOfRange(
            config.access_token_ttl_seconds,
        ))?;

    // Registration order is selection order.
    let strategies: Vec<Arc<dyn AuthenticationStrategy>> = vec![Arc::new(
        LocalAuthenticationStrategy::new(directory, verifier, codec, ttl)?,
    )];

    let mut dispatcher = AuthenticationDispatcher::new();
    for strategy in strategies {
        let tag = strategy.auth_type();
        if !dispatcher.register(strategy) {
            warn!(
                auth_type = tag,
                "duplicate authentication strategy; first registration wins"
            );
        }
    }

    if !dispatcher.supports(&config.default_auth_type) {
        return Err(FactoryError::DefaultAuthTypeUnsupported(
            config.default_auth_type.clone(),
        ));
    }

    Ok(Arc::new(dispatcher))
}
