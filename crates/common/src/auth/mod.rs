use async_trait::async_trait;

mod memory;
mod password;

pub use memory::MemoryAccountStore;
pub use password::{PasswordRecord, DIGEST_SIZE, SALT_SIZE};

/// Longest username the registry accepts, in bytes.
pub const MAX_USERNAME_BYTES: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    #[error("username already taken: {0}")]
    DuplicateUsername(String),
    #[error("invalid username: {0}")]
    InvalidUsername(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Durable registry of accounts keyed by username.
///
/// Implementations must make `create` atomic per username: under concurrent
/// calls with the same name, exactly one succeeds and the rest observe
/// [`AccountStoreError::DuplicateUsername`]. `verify` answers `false` (not
/// an error) for unknown usernames, in the same shape as a wrong password.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    async fn create(&self, username: &str, password: &str) -> Result<(), AccountStoreError>;

    async fn verify(&self, username: &str, password: &str) -> Result<bool, AccountStoreError>;
}

/// Shared username rules for every backend.
pub fn validate_username(username: &str) -> Result<(), AccountStoreError> {
    if username.is_empty() {
        return Err(AccountStoreError::InvalidUsername("empty".to_owned()));
    }
    if username.len() > MAX_USERNAME_BYTES {
        return Err(AccountStoreError::InvalidUsername(format!(
            "longer than {} bytes",
            MAX_USERNAME_BYTES
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(matches!(
            validate_username(""),
            Err(AccountStoreError::InvalidUsername(_))
        ));
        let long = "u".repeat(MAX_USERNAME_BYTES + 1);
        assert!(matches!(
            validate_username(&long),
            Err(AccountStoreError::InvalidUsername(_))
        ));
    }
}
