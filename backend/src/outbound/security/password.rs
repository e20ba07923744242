//! Argon2 password hashing and verification.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{PasswordHashError, PasswordHasher, PasswordVerifier};

/// Produces PHC-formatted Argon2id hashes with a fresh random salt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        // A v4 UUID carries 122 random bits from the OS generator.
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
            .map_err(|err| PasswordHashError::new(err.to_string()))?;
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::new(err.to_string()))
    }
}

/// Verifies PHC-formatted Argon2 hashes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordVerifier;

impl PasswordVerifier for Argon2PasswordVerifier {
    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "stored password hash is not a PHC string");
                return false;
            }
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::test_support::hash_password;
    use rstest::rstest;

    #[rstest]
    fn matching_password_verifies() {
        let hash = hash_password("correct horse");
        assert!(Argon2PasswordVerifier.verify(&hash, "correct horse"));
        assert!(!Argon2PasswordVerifier.verify(&hash, "wrong horse"));
    }

    #[rstest]
    fn hashes_verify_and_are_salted() {
        let first = Argon2PasswordHasher.hash("correct horse").expect("hash");
        let second = Argon2PasswordHasher.hash("correct horse").expect("hash");
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(Argon2PasswordVerifier.verify(&first, "correct horse"));
    }

    #[rstest]
    fn unparseable_hash_never_matches() {
        assert!(!Argon2PasswordVerifier.verify("plaintext", "plaintext"));
    }
}
