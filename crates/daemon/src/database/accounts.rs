use time::OffsetDateTime;

use crate::database::Database;

/// One stored account record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub username: String,
    pub salt: String,
    pub password_hash: String,
    /// Unix seconds at creation time.
    pub created_at: i64,
}

impl Database {
    /// Insert an account, returning whether the row landed. `false` means
    /// the username was already present; the check and the insert are one
    /// atomic statement.
    pub async fn insert_account(
        &self,
        username: &str,
        salt: &str,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let created_at = OffsetDateTime::now_utc().unix_timestamp();
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO accounts (username, salt, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(username)
        .bind(salt)
        .bind(password_hash)
        .bind(created_at)
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn get_account(&self, username: &str) -> Result<Option<AccountRow>, sqlx::Error> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT username, salt, password_hash, created_at
            FROM accounts
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&**self)
        .await
    }

    pub async fn count_accounts(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(&**self)
            .await
    }
}
