//! Password storage for registered users.
//!
//! A stored password is either an Argon2 PHC string or plaintext (the
//! bundled seed users). Verification picks the comparison from the stored
//! value itself, so both kinds coexist in one user list.
//!
//! Argon2 work runs on tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::config::PasswordScheme;
use crate::error::{StoreError, StoreResult};

/// Encodes `password` for storage under `scheme`.
pub async fn hash_password(password: &str, scheme: PasswordScheme) -> StoreResult<String> {
    match scheme {
        PasswordScheme::Plain => Ok(password.to_string()),
        PasswordScheme::Argon2 => {
            let password = password.to_string();
            tokio::task::spawn_blocking(move || hash_argon2(&password))
                .await
                .map_err(|e| StoreError::Password(e.to_string()))?
        }
    }
}

/// Checks `password` against a stored value of either kind.
pub async fn verify_password(password: &str, stored: &str) -> bool {
    if PasswordHash::new(stored).is_err() {
        return password == stored;
    }

    let (password, stored) = (password.to_string(), stored.to_string());
    tokio::task::spawn_blocking(move || verify_argon2(&password, &stored))
        .await
        .unwrap_or(false)
}

fn hash_argon2(password: &str) -> StoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::Password(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_argon2(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
