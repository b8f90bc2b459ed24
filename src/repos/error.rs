/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - sqlx::Error を制約違反 / not found / データ不整合に分類する
 */
use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unique constraint violated")]
    UniqueViolation(#[source] sqlx::Error),
    #[error("record not found")]
    RecordNotFound,
    #[error("foreign key constraint violated")]
    ForeignKeyViolation(#[source] sqlx::Error),
    #[error("invalid data")]
    InvalidData(#[source] sqlx::Error),
    #[error("db error")]
    Query(#[source] sqlx::Error),
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e {
            let code = dbe.code().map(|c| c.into_owned());
            return match code.as_deref() {
                Some(UNIQUE_VIOLATION) => RepoError::UniqueViolation(e),
                Some(FOREIGN_KEY_VIOLATION) => RepoError::ForeignKeyViolation(e),
                _ => RepoError::Query(e),
            };
        }

        let invalid_data = matches!(
            e,
            sqlx::Error::ColumnNotFound(_)
                | sqlx::Error::ColumnIndexOutOfBounds { .. }
                | sqlx::Error::ColumnDecode { .. }
                | sqlx::Error::TypeNotFound { .. }
                | sqlx::Error::Decode(_)
        );

        match e {
            sqlx::Error::RowNotFound => RepoError::RecordNotFound,
            e if invalid_data => RepoError::InvalidData(e),
            e => RepoError::Query(e),
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        Self::from_sqlx(e)
    }
}
