use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::token_codec::TokenError;
use crate::services::password::VerifierError;

/// Failures of the login / principal-resolution path.
///
/// `PrincipalNotFound` and `InvalidCredentials` stay distinct here for logging;
/// the HTTP layer collapses both into one 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("principal not found")]
    PrincipalNotFound,
    #[error("Unsupported auth type: {0}")]
    UnsupportedAuthType(String),
    #[error(transparent)]
    Directory(#[from] RepoError),
    #[error(transparent)]
    Verifier(#[from] VerifierError),
    // Login only signs tokens; a bearer token that fails to parse is handled by the
    // request middleware and never becomes an AuthError.
    #[error("token issuance failed: {0}")]
    Token(#[from] TokenError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
