//! Password hashing / verification (argon2id, PHC strings).
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("invalid hashing parameters: {0}")]
    Params(String),
    #[error("salt generation failed: {0}")]
    Salt(String),
    #[error("hashing failed: {0}")]
    Hash(String),
}

/// Compares a plaintext secret against a stored hash.
///
/// Implementations are CPU-bound and synchronous; async callers should run them on a
/// blocking thread.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn hash(&self, secret: &str) -> Result<String, VerifierError>;

    /// A stored hash that cannot be parsed verifies as `false`, not as an error.
    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, VerifierError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            m_cost: Params::DEFAULT_M_COST,
            t_cost: Params::DEFAULT_T_COST,
            p_cost: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for Argon2Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Verifier").finish_non_exhaustive()
    }
}

impl Argon2Verifier {
    pub fn new(params: Argon2Params) -> Result<Self, VerifierError> {
        let params = Params::new(params.m_cost, params.t_cost, params.p_cost, None)
            .map_err(|e| VerifierError::Params(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, secret: &str) -> Result<String, VerifierError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::fill(&mut salt_bytes).map_err(|e| VerifierError::Salt(e.to_string()))?;
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| VerifierError::Salt(e.to_string()))?;

        let phc = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| VerifierError::Hash(e.to_string()))?
            .to_string();

        Ok(phc)
    }

    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, VerifierError> {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return Ok(false);
        };
        Ok(self
            .argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
pub(crate) fn test_verifier() -> Argon2Verifier {
    // Minimal cost so tests stay fast.
    Argon2Verifier::new(Argon2Params {
        m_cost: 64,
        t_cost: 1,
        p_cost: 1,
    })
    .unwrap()
}
