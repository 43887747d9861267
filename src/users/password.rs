//! Argon2 hashing for stored user passwords.

use argon2::{
    password_hash::{self, PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// PHC-format hash of `plain` under a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string())
}

/// Whether `plain` hashes to `stored`. A stored value that is not a PHC string
/// never matches.
#[cfg(test)]
pub fn password_matches(plain: &str, stored: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2_and_not_the_plaintext() {
        let hash = hash_password("longenough").unwrap();
        assert_ne!(hash, "longenough");
        assert!(hash.starts_with("$argon2id$"), "{hash}");
        assert!(password_matches("longenough", &hash));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = hash_password("correct-horse").unwrap();
        let b = hash_password("correct-horse").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn other_passwords_do_not_match() {
        let hash = hash_password("correct-horse-battery-staple").unwrap();
        assert!(!password_matches("wrong-password", &hash));
    }

    #[test]
    fn malformed_stored_value_never_matches() {
        assert!(!password_matches("anything", "not-a-valid-hash"));
    }
}
