//! Salted password hashing with argon2id.
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use error_stack::{Result, ResultExt};
use once_cell::sync::Lazy;
use thiserror::Error;

use super::Sensitive;

static CONTEXT: Lazy<Argon2<'static>> = Lazy::new(|| {
    Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::DEFAULT,
    )
});

#[derive(Debug, Error)]
#[error("Failed to generate password hash")]
pub struct HashPasswordError;

pub fn hash(password: impl AsRef<[u8]>) -> Result<String, HashPasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = CONTEXT
        .hash_password(password.as_ref(), &salt)
        .change_context(HashPasswordError)?;

    Ok(password_hash.to_string())
}

#[derive(Debug, Error)]
#[error("Failed to verify password")]
pub struct VerifyPasswordError;

pub fn verify(password: &[u8], hash: &str) -> Result<bool, VerifyPasswordError> {
    let hash = PasswordHash::new(hash)
        .change_context(VerifyPasswordError)
        .attach_printable("could not parse password hash")?;

    match CONTEXT.verify_password(password, &hash) {
        Ok(..) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(error) => Err(error).change_context(VerifyPasswordError),
    }
}

/// [`hash`] on the blocking thread pool, argon2 is too slow for
/// an async worker.
#[tracing::instrument(skip_all, name = "password.hash")]
pub async fn hash_blocking(password: Sensitive<String>) -> Result<String, HashPasswordError> {
    tokio::task::spawn_blocking(move || hash(password.as_str()))
        .await
        .change_context(HashPasswordError)?
}

#[tracing::instrument(skip_all, name = "password.verify")]
pub async fn verify_blocking(
    password: Sensitive<String>,
    hash: String,
) -> Result<bool, VerifyPasswordError> {
    tokio::task::spawn_blocking(move || verify(password.as_str().as_bytes(), &hash))
        .await
        .change_context(VerifyPasswordError)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted() {
        let first = hash("abcdefg1").unwrap();
        let second = hash("abcdefg1").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn verifies_only_the_original_password() {
        let hashed = hash("abcdefg1").unwrap();
        assert!(verify(b"abcdefg1", &hashed).unwrap());
        assert!(!verify(b"abcdefg2", &hashed).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify(b"abcdefg1", "not a phc string").is_err());
    }

    #[tokio::test]
    async fn blocking_wrappers() {
        let hashed = hash_blocking(Sensitive::from("abcdefg1")).await.unwrap();
        assert!(verify_blocking(Sensitive::from("abcdefg1"), hashed).await.unwrap());
    }
}
