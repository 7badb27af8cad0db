use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;

use crate::utils::error::AppError;

const SALT_LENGTH: usize = 16;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::InternalServerError(format!("Failed to encode salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// The salt is embedded in the hash string, so verification needs no
/// extra state. Unparseable hashes verify as false.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_password_verifies() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2hunter2"));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(!verify_password(&hash, "letmeinletmein"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("hunter2hunter2").unwrap();
        let b = hash_password("hunter2hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_hash_fails_closed() {
        assert!(!verify_password("not-a-phc-string", "whatever"));
    }
}
