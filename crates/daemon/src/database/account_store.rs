use async_trait::async_trait;

use common::auth::{validate_username, AccountStore, AccountStoreError, PasswordRecord};

use crate::database::Database;

/// Durable [`AccountStore`] backed by the sqlite accounts table.
///
/// Uniqueness is enforced by the primary key, so concurrent creates of the
/// same username resolve in the database rather than under any in-process
/// lock.
#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    db: Database,
}

impl SqliteAccountStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn create(&self, username: &str, password: &str) -> Result<(), AccountStoreError> {
        validate_username(username)?;
        let record = PasswordRecord::derive(password);
        let inserted = self
            .db
            .insert_account(username, record.salt(), record.digest())
            .await
            .map_err(|e| AccountStoreError::Backend(e.into()))?;

        if inserted {
            Ok(())
        } else {
            Err(AccountStoreError::DuplicateUsername(username.to_owned()))
        }
    }

    async fn verify(&self, username: &str, password: &str) -> Result<bool, AccountStoreError> {
        let row = self
            .db
            .get_account(username)
            .await
            .map_err(|e| AccountStoreError::Backend(e.into()))?;

        match row {
            Some(row) => {
                Ok(PasswordRecord::from_parts(row.salt, row.password_hash).matches(password))
            }
            // Unknown user: burn the same digest work as the real path.
            None => Ok(PasswordRecord::placeholder().matches(password)),
        }
    }
}
