/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT_SECRET, DATABASE_URL, token TTL, Argon2 params など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::services::auth::LOCAL_AUTH_TYPE;
use crate::services::password::Argon2Params;

pub const MIN_SECRET_BYTES: usize = 32;
// 1 year
pub const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// HMAC signing key. Immutable for the life of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub database_url: Option<String>,

    pub jwt_secret: SigningSecret,
    // Token lifetime (seconds)
    pub access_token_ttl_seconds: u64,
    pub default_auth_type: String,

    pub argon2: Argon2Params,

    pub http_body_limit_bytes: usize,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 8080)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let access_token_ttl_seconds: u64 = parse_or(&lookup, "ACCESS_TOKEN_TTL_SECONDS", 3600)?;
        if !(1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(&access_token_ttl_seconds) {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"));
        }

        let default_auth_type = lookup("AUTH_DEFAULT_TYPE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| LOCAL_AUTH_TYPE.to_string());

        let defaults = Argon2Params::default();
        let argon2 = Argon2Params {
            m_cost: parse_or(&lookup, "ARGON2_M_COST", defaults.m_cost)?,
            t_cost: parse_or(&lookup, "ARGON2_T_COST", defaults.t_cost)?,
            p_cost: parse_or(&lookup, "ARGON2_P_COST", defaults.p_cost)?,
        };

        // both must be > 0
        let http_body_limit_bytes: usize = parse_or(&lookup, "HTTP_BODY_LIMIT_BYTES", 1024 * 1024)?;
        if http_body_limit_bytes == 0 {
            return Err(ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"));
        }
        let http_timeout_seconds: u64 = parse_or(&lookup, "HTTP_TIMEOUT_SECONDS", 30)?;
        if http_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("HTTP_TIMEOUT_SECONDS"));
        }

        Ok(Config {
            addr,
            app_env,
            database_url,
            jwt_secret: SigningSecret(jwt_secret.into_bytes()),
            access_token_ttl_seconds,
            default_auth_type,
            argon2,
            http_body_limit_bytes,
            http_timeout: Duration::from_secs(http_timeout_seconds),
        })
    }
}

// Absent → default; present but unparsable → Invalid.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}
