use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use crate::repos::PrincipalDirectory;
use crate::services::auth::error::AuthError;
use crate::services::auth::principal::{AuthenticatedPrincipal, Credential};
use crate::services::auth::strategy::AuthenticationStrategy;
use crate::services::auth::token_codec::{IssuedToken, TokenCodec};
use crate::services::password::{CredentialVerifier, VerifierError};

pub const LOCAL_AUTH_TYPE: &str = "LOCAL";

/// Username + password against the principal directory.
pub struct LocalAuthenticationStrategy {
    directory: Arc<dyn PrincipalDirectory>,
    verifier: Arc<dyn CredentialVerifier>,
    codec: Arc<TokenCodec>,
    default_ttl: Duration,
    // Verified against when the username is unknown, so both failure paths pay for one hash check.
    decoy_hash: String,
}

impl std::fmt::Debug for LocalAuthenticationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAuthenticationStrategy")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl LocalAuthenticationStrategy {
    pub fn new(
        directory: Arc<dyn PrincipalDirectory>,
        verifier: Arc<dyn CredentialVerifier>,
        codec: Arc<TokenCodec>,
        default_ttl: Duration,
    ) -> Result<Self, VerifierError> {
        let decoy_hash = verifier.hash(&uuid::Uuid::new_v4().to_string())?;

        Ok(Self {
            directory,
            verifier,
            codec,
            default_ttl,
            decoy_hash,
        })
    }
}

#[async_trait]
impl AuthenticationStrategy for LocalAuthenticationStrategy {
    fn auth_type(&self) -> &'static str {
        LOCAL_AUTH_TYPE
    }

    async fn authenticate(&self, credential: &Credential) -> Result<IssuedToken, AuthError> {
        let record = self
            .directory
            .find_by_username(&credential.username)
            .await?;

        let stored_hash = match &record {
            Some(r) => r.password_hash.clone(),
            None => self.decoy_hash.clone(),
        };
        let verifier = Arc::clone(&self.verifier);
        let secret = credential.secret.clone();
        let matches =
            tokio::task::spawn_blocking(move || verifier.verify(&secret, &stored_hash)).await??;

        let Some(record) = record else {
            return Err(AuthError::PrincipalNotFound);
        };
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.codec.issue(&record.username, self.default_ttl)?)
    }

    async fn load_principal(&self, username: &str) -> Result<AuthenticatedPrincipal, AuthError> {
        let record = self
            .directory
            .find_by_username(username)
            .await?
            .ok_or(AuthError::PrincipalNotFound)?;

        Ok(AuthenticatedPrincipal::from(&record))
    }
}
