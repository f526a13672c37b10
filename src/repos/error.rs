/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(&'static str),
}

impl RepoError {
    /// Unique-violation (23505) becomes `Conflict`, naming the offending column when known.
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            let field = match dbe.constraint() {
                Some(c) if c.contains("email") => "email",
                _ => "username",
            };
            return RepoError::Conflict(field);
        }
        RepoError::Db(e)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
