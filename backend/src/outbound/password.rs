//! Argon2 implementation of the [`PasswordVerifier`] port.
//!
//! Stored hashes are PHC strings (`$argon2id$v=19$...`). [`hash_password`]
//! produces them for the `create-user` tool and test fixtures.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier as _};

use crate::domain::ports::{PasswordVerifier, PasswordVerifierError};

/// Verifies passwords against argon2 PHC hashes using default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordVerifier;

impl PasswordVerifier for Argon2PasswordVerifier {
    fn verify(&self, password: &str, password_hash: &str) -> Result<bool, PasswordVerifierError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|err| PasswordVerifierError::malformed_hash(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordVerifierError::malformed_hash(err.to_string())),
        }
    }
}

/// Hash `password` with a fresh random salt.
///
/// # Examples
/// ```
/// use ticketrax::outbound::password::hash_password;
///
/// let hash = hash_password("correct horse").expect("hashing succeeds");
/// assert!(hash.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}
