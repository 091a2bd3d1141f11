mod account_store;
mod accounts;
mod sqlite;

use std::ops::Deref;

use sqlx::SqlitePool;

pub use account_store::SqliteAccountStore;
pub use accounts::AccountRow;

#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    /// Open and migrate the database behind `url`. Only `sqlite` URLs are
    /// recognized.
    pub async fn connect(url: &url::Url) -> Result<Self, DatabaseSetupError> {
        match url.scheme() {
            "sqlite" => {
                let pool = sqlite::connect_sqlite(url).await?;
                sqlite::migrate_sqlite(&pool).await?;
                Ok(Self(pool))
            }
            other => Err(DatabaseSetupError::UnknownDbType(other.to_owned())),
        }
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("could not connect to the database: {0}")]
    Unavailable(sqlx::Error),

    #[error("database migration failed: {0}")]
    MigrationFailed(sqlx::migrate::MigrateError),

    #[error("unsupported database scheme: {0}")]
    UnknownDbType(String),
}
