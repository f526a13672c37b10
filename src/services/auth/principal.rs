/*
 * Responsibility
 * - login 入力 (Credential) と、検証済みリクエストに付与される主体 (AuthenticatedPrincipal)
 * - middleware が request extensions に格納し、handler は extractor 経由でこの型だけを受け取る
 * - 生成後は不変 (リクエスト間で共有しない)
 */
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::repos::PrincipalRecord;

/// Login input. Never persisted; `Debug` omits the secret.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub secret: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    username: String,
    roles: BTreeSet<String>,
}

impl AuthenticatedPrincipal {
    pub fn new<I, S>(username: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl From<&PrincipalRecord> for AuthenticatedPrincipal {
    fn from(record: &PrincipalRecord) -> Self {
        Self::new(record.username.clone(), [record.role.as_str()])
    }
}
