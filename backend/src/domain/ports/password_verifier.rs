//! Port for checking a password against a stored hash.
//!
//! Verification is CPU-bound, so the trait is synchronous and callers run it
//! on the blocking pool.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password verifier adapters.
    pub enum PasswordVerifierError {
        /// The stored hash could not be parsed.
        MalformedHash { message: String } =>
            "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync {
    /// Return `Ok(false)` on mismatch; errors are reserved for unusable hashes.
    fn verify(&self, password: &str, password_hash: &str) -> Result<bool, PasswordVerifierError>;
}
