use bcrypt::{hash, verify, BcryptError};
use sha2::{Digest, Sha256};

const BCRYPT_COST: u32 = 8;

/// Hash a password using bcrypt
///
/// ```
/// use wedding_utils::hash::{bcrypt_check, bcrypt_hash};
///
/// let hashed = bcrypt_hash("my_password").unwrap();
/// assert!(bcrypt_check("my_password", &hashed));
/// ```
pub fn bcrypt_hash(password: &str) -> Result<String, BcryptError> {
    hash(password.as_bytes(), BCRYPT_COST)
}

/// Compare a plaintext password against a bcrypt hash. Malformed hashes never match.
pub fn bcrypt_check(password: &str, hash: &str) -> bool {
    verify(password.as_bytes(), hash).unwrap_or(false)
}

/// Lowercase hex SHA-256 of `data`, optionally salted with `extra`.
pub fn sha256v(data: &[u8], extra: Option<&[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    if let Some(extra) = extra {
        hasher.update(extra);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_hash_and_check() {
        let hash = bcrypt_hash("rings").unwrap();

        assert!(bcrypt_check("rings", &hash));
        assert!(!bcrypt_check("cake", &hash));
        assert!(!bcrypt_check("rings", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_sha256v() {
        let hash = sha256v(b"hello world", None);
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_ne!(hash, sha256v(b"hello world", Some(b"v2")));
    }
}
