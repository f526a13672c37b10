//! Bearer token codec (HS256 JWT).
//!
//! - `issue` signs `{sub, iat, exp}` with the process-wide secret.
//! - `extract_subject` reads `sub` without any verification (cheap pre-check).
//! - `validate` verifies signature + subject + expiry and collapses every failure to `false`.
//!
//! The codec holds only immutable key material, so a single instance is shared by
//! every in-flight request without locking.
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature or structure rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token subject does not match")]
    SubjectMismatch,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token plus the metadata handlers need for the response body.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: u64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock in `verify`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl_seconds = ttl_in_whole_seconds(ttl);
        let iat = now.timestamp();
        let exp = iat + ttl_seconds;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            expires_at: DateTime::<Utc>::from_timestamp(exp, 0).unwrap_or(now),
            expires_in: ttl_seconds as u64,
        })
    }

    /// Read `sub` from the payload segment. Signature and expiry are NOT checked.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenError::Malformed);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(segments[1])
            .map_err(|_| TokenError::Malformed)?;

        #[derive(Deserialize)]
        struct SubjectOnly {
            sub: String,
        }

        let claims: SubjectOnly =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        Ok(claims.sub)
    }

    pub fn validate(&self, token: &str, expected_subject: &str) -> bool {
        self.validate_at(token, expected_subject, Utc::now())
    }

    pub fn validate_at(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        self.verify(token, expected_subject, now).is_ok()
    }

    /// Full check with the failure reason kept (for logging at the HTTP edge).
    ///
    /// The HMAC comparison happens inside `jsonwebtoken` and is constant-time.
    /// A token is expired at exactly `exp`.
    pub fn verify(
        &self,
        token: &str,
        expected_subject: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.sub != expected_subject {
            return Err(TokenError::SubjectMismatch);
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

// Sub-second remainders round up so any positive ttl yields `exp > iat`.
fn ttl_in_whole_seconds(ttl: Duration) -> i64 {
    if ttl <= Duration::zero() {
        return 0;
    }
    let whole = ttl.num_seconds();
    if ttl > Duration::seconds(whole) {
        whole + 1
    } else {
        whole
    }
}
