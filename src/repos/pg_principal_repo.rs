/*
 * Responsibility
 * - users テーブル向け SQLx 操作 (PrincipalDirectory の Postgres 実装)
 * - PgPool を受け取り lookup / create / list を提供
 * - role は TEXT ("USER" / "ADMIN") として保存
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::principal_repo::{
    NewPrincipal, PrincipalDirectory, PrincipalRecord, ProfileUpdate, Role,
};

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    email: String,
    name: String,
    role: String,
}

impl TryFrom<UserRow> for PrincipalRecord {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| RepoError::Db(sqlx::Error::Decode(e.into())))?;

        Ok(PrincipalRecord {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            email: row.email,
            name: row.name,
            role,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgPrincipalRepo {
    pool: PgPool,
}

impl PgPrincipalRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalDirectory for PgPrincipalRepo {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<PrincipalRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, email, name, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PrincipalRecord::try_from).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)"#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1))"#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, new: NewPrincipal) -> RepoResult<PrincipalRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, email, name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, email, name, role
            "#,
        )
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.email)
        .bind(&new.name)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.try_into()
    }

    async fn list(&self) -> RepoResult<Vec<PrincipalRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, email, name, role
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PrincipalRecord::try_from).collect()
    }

    async fn update_profile(
        &self,
        username: &str,
        update: ProfileUpdate,
    ) -> RepoResult<Option<PrincipalRecord>> {
        // email NULL → 既存値を維持
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2,
                email = COALESCE($3, email)
            WHERE username = $1
            RETURNING id, username, password_hash, email, name, role
            "#,
        )
        .bind(username)
        .bind(&update.name)
        .bind(update.email.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(PrincipalRecord::try_from).transpose()
    }

    async fn delete(&self, username: &str) -> RepoResult<bool> {
        let result = sqlx::query(r#"DELETE FROM users WHERE username = $1"#)
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
