//! In-process principal directory (development without `DATABASE_URL`, and tests).
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::principal_repo::{
    NewPrincipal, PrincipalDirectory, PrincipalRecord, ProfileUpdate,
};

#[derive(Debug, Default)]
pub struct InMemoryPrincipalRepo {
    // keyed by username
    users: RwLock<HashMap<String, PrincipalRecord>>,
}

impl InMemoryPrincipalRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryPrincipalRepo {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<PrincipalRecord>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> RepoResult<bool> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn create(&self, new: NewPrincipal) -> RepoResult<PrincipalRecord> {
        // Single write lock so the uniqueness checks and the insert are atomic.
        let mut users = self.users.write().await;

        if users.contains_key(&new.username) {
            return Err(RepoError::Conflict("username"));
        }
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&new.email)) {
            return Err(RepoError::Conflict("email"));
        }

        let record = PrincipalRecord {
            id: Uuid::new_v4(),
            username: new.username,
            password_hash: new.password_hash,
            email: new.email,
            name: new.name,
            role: new.role,
        };
        users.insert(record.username.clone(), record.clone());

        Ok(record)
    }

    async fn list(&self) -> RepoResult<Vec<PrincipalRecord>> {
        let mut rows: Vec<PrincipalRecord> = self.users.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(rows)
    }

    async fn update_profile(
        &self,
        username: &str,
        update: ProfileUpdate,
    ) -> RepoResult<Option<PrincipalRecord>> {
        let mut users = self.users.write().await;

        if let Some(email) = &update.email
            && users
                .values()
                .any(|u| u.username != username && u.email.eq_ignore_ascii_case(email))
        {
            return Err(RepoError::Conflict("email"));
        }

        let Some(record) = users.get_mut(username) else {
            return Ok(None);
        };
        record.name = update.name;
        if let Some(email) = update.email {
            record.email = email;
        }

        Ok(Some(record.clone()))
    }

    async fn delete(&self, username: &str) -> RepoResult<bool> {
        Ok(self.users.write().await.remove(username).is_some())
    }
}
