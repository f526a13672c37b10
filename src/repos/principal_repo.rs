/*
 * Responsibility
 * - 認証コアが依存する principal directory の契約 (trait)
 * - username → 保存済み credential record (password hash, role)
 * - 永続化の実装 (Postgres / in-memory) はこの trait の後ろに隠す
 */
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    // Accepts the legacy `ROLE_` prefix as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix("ROLE_").unwrap_or(s);
        match bare.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Stored credential record.
#[derive(Debug, Clone)]
pub struct PrincipalRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Self-service profile edit. `email: None` keeps the stored address.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait PrincipalDirectory: Send + Sync + 'static {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<PrincipalRecord>>;

    async fn exists_by_username(&self, username: &str) -> RepoResult<bool>;

    async fn exists_by_email(&self, email: &str) -> RepoResult<bool>;

    // Unique username/email violations surface as `RepoError::Conflict`.
    async fn create(&self, new: NewPrincipal) -> RepoResult<PrincipalRecord>;

    async fn list(&self) -> RepoResult<Vec<PrincipalRecord>>;

    /// `None` when the username is unknown. An email taken by another principal is `Conflict("email")`.
    async fn update_profile(
        &self,
        username: &str,
        update: ProfileUpdate,
    ) -> RepoResult<Option<PrincipalRecord>>;

    /// `false` when the username is unknown.
    async fn delete(&self, username: &str) -> RepoResult<bool>;
}
