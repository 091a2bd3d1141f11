//! Salted password records.
//!
//! A record stores a random per-account salt and the SHA-256 digest of
//! `salt || password`, both hex-encoded. Verification recomputes the digest
//! with the stored salt and compares in constant time, so a mismatch reveals
//! nothing about how much of the digest agreed.

use sha2::{Digest, Sha256};

/// Size of the per-account random salt in bytes
pub const SALT_SIZE: usize = 16;
/// Size of a SHA-256 digest in bytes
pub const DIGEST_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRecord {
    salt: String,
    digest: String,
}

impl PasswordRecord {
    /// Derive a record for `password` with a fresh random salt.
    pub fn derive(password: &str) -> Self {
        let mut salt = [0u8; SALT_SIZE];
        getrandom::getrandom(&mut salt).expect("failed to generate random bytes");
        let digest = digest_hex(&salt, password);
        Self {
            salt: hex::encode(salt),
            digest,
        }
    }

    /// Reassemble a record from stored fields.
    pub fn from_parts(salt: String, digest: String) -> Self {
        Self { salt, digest }
    }

    /// A record no password can ever match.
    ///
    /// Verifying against it costs the same digest computation as the real
    /// path, so lookups for unknown usernames are indistinguishable in
    /// shape and cost from wrong-password failures.
    pub fn placeholder() -> Self {
        Self {
            salt: hex::encode([0u8; SALT_SIZE]),
            digest: String::new(),
        }
    }

    /// Hex-encoded salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Hex-encoded digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Check `password` against this record in constant time.
    pub fn matches(&self, password: &str) -> bool {
        let salt = match hex::decode(&self.salt) {
            Ok(salt) => salt,
            Err(_) => return false,
        };
        let candidate = digest_hex(&salt, password);
        constant_time_eq(candidate.as_bytes(), self.digest.as_bytes())
    }
}

fn digest_hex(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Byte-wise comparison that touches every byte before answering.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
