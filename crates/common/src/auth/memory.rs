use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::password::PasswordRecord;
use super::{validate_username, AccountStore, AccountStoreError};

/// In-memory account store.
///
/// The reference implementation of [`AccountStore`]: used by tests and as
/// the fallback when no durable backend is configured. The entry check and
/// insert share one write-lock critical section, which makes creation a
/// compare-and-insert; nothing slow runs while the lock is held.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, PasswordRecord>>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, username: &str, password: &str) -> Result<(), AccountStoreError> {
        validate_username(username)?;
        let record = PasswordRecord::derive(password);
        let mut accounts = self.accounts.write();
        match accounts.entry(username.to_owned()) {
            Entry::Occupied(_) => Err(AccountStoreError::DuplicateUsername(username.to_owned())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn verify(&self, username: &str, password: &str) -> Result<bool, AccountStoreError> {
        let record = self.accounts.read().get(username).cloned();
        match record {
            Some(record) => Ok(record.matches(password)),
            // Unknown user: burn the same digest work as the real path.
            None => Ok(PasswordRecord::placeholder().matches(password)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_create_then_verify() {
        let store = MemoryAccountStore::new();
        store.create("alice", "wonderland").await.unwrap();

        assert!(store.verify("alice", "wonderland").await.unwrap());
        assert!(!store.verify("alice", "underland").await.unwrap());
        assert!(!store.verify("bob", "wonderland").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let store = MemoryAccountStore::new();
        store.create("alice", "first").await.unwrap();

        let result = store.create("alice", "second").await;
        assert!(matches!(
            result,
            Err(AccountStoreError::DuplicateUsername(_))
        ));

        // The original password still stands.
        assert!(store.verify("alice", "first").await.unwrap());
        assert!(!store.verify("alice", "second").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_username_rejected() {
        let store = MemoryAccountStore::new();
        let result = store.create("", "pass").await;
        assert!(matches!(result, Err(AccountStoreError::InvalidUsername(_))));
        assert!(store.is_empty());
    }
}
