//! bcrypt password hashing.
//!
//! bcrypt only looks at the first 72 bytes of its input. The cut is made here,
//! on the raw UTF-8 bytes, so that every hash this service writes or checks
//! sees exactly the bytes any other bcrypt implementation would have seen.

use super::Error;
use std::fmt;

/// Longest input bcrypt consumes.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// A bcrypt hash in modular-crypt form (`$2b$12$...`).
///
/// Deliberately not `Serialize` and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash read back from storage. Its structure is only checked on verify.
    #[must_use]
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// The raw hash, for the storage adapter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// First 72 bytes of the UTF-8 encoding; may end in the middle of a code point.
#[must_use]
pub fn truncate(plaintext: &str) -> &[u8] {
    let bytes = plaintext.as_bytes();
    &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)]
}

/// Hash a password with a fresh salt.
///
/// # Errors
///
/// Returns [`Error::Hashing`] if the cost is out of range or salt generation fails.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<PasswordHash, Error> {
    bcrypt::hash(truncate(plaintext), cost)
        .map(PasswordHash)
        .map_err(Error::Hashing)
}

/// Check a password against a stored hash.
///
/// A mismatch is `Ok(false)`.
///
/// # Errors
///
/// Returns [`Error::MalformedHash`] when the stored hash cannot be parsed.
pub fn verify_password(plaintext: &str, hash: &PasswordHash) -> Result<bool, Error> {
    bcrypt::verify(truncate(plaintext), hash.as_str()).map_err(|_| Error::MalformedHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("secret123", MIN_COST).unwrap();
        assert!(hash.as_str().starts_with("$2b$04$"));
        assert!(verify_password("secret123", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false() {
        let hash = hash_password("secret123", MIN_COST).unwrap();
        assert!(!verify_password("secret124", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("same", MIN_COST).unwrap();
        let b = hash_password("same", MIN_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn bytes_past_72_are_ignored() {
        let base = "p".repeat(MAX_PASSWORD_BYTES);
        let hash = hash_password(&base, MIN_COST).unwrap();
        assert!(verify_password(&format!("{base}suffix"), &hash).unwrap());

        let long = hash_password(&format!("{base}other-suffix"), MIN_COST).unwrap();
        assert!(verify_password(&base, &long).unwrap());
    }

    #[test]
    fn difference_inside_72_bytes_matters() {
        let mut other = "p".repeat(MAX_PASSWORD_BYTES - 1);
        other.push('q');
        let hash = hash_password(&"p".repeat(MAX_PASSWORD_BYTES), MIN_COST).unwrap();
        assert!(!verify_password(&other, &hash).unwrap());
    }

    #[test]
    fn truncation_cuts_raw_bytes() {
        // 71 ASCII bytes followed by a two byte code point.
        let password = format!("{}é", "a".repeat(71));
        let cut = truncate(&password);
        assert_eq!(cut.len(), MAX_PASSWORD_BYTES);
        assert_eq!(cut[71], 0xC3);

        let hash = hash_password(&password, MIN_COST).unwrap();
        // Any other continuation byte is beyond the cut.
        assert!(verify_password(&format!("{}è", "a".repeat(71)), &hash).unwrap());
    }

    #[test]
    fn short_passwords_are_untouched() {
        assert_eq!(truncate("hunter2"), b"hunter2");
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hash = PasswordHash::from_stored("not-a-bcrypt-hash".to_string());
        assert!(matches!(
            verify_password("secret123", &hash),
            Err(Error::MalformedHash)
        ));
    }

    #[test]
    fn stored_hash_round_trips_through_storage() {
        let hash = hash_password("secret123", MIN_COST).unwrap();
        let stored = PasswordHash::from_stored(hash.as_str().to_string());
        assert!(verify_password("secret123", &stored).unwrap());
    }

    #[test]
    fn debug_is_redacted() {
        let hash = hash_password("secret123", MIN_COST).unwrap();
        assert_eq!(format!("{hash:?}"), "PasswordHash(***)");
    }
}
