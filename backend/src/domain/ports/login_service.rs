//! Driving ports for the identity gateway.
//!
//! Inbound adapters call [`LoginService`] to exchange credentials for a token
//! and [`TokenAuthenticator`] to turn a presented token back into a user,
//! without knowing which directory or token store backs them.

use async_trait::async_trait;

use crate::domain::{AuthSession, AuthToken, Error, LoginCredentials, UserProfile};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return a (possibly reused) token plus the
    /// user's public profile.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;
}

/// Domain use-case port for resolving bearer tokens on each request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Return the token's owner, or an `unauthorized` error when the token is
    /// unknown.
    async fn resolve(&self, token: &AuthToken) -> Result<UserProfile, Error>;
}
