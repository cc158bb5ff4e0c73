//! Port for auth token persistence.
//!
//! A user holds at most one token. Issuance is get-or-create so concurrent
//! logins for the same user converge on a single stored key.

use async_trait::async_trait;

use crate::domain::{AuthToken, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token store adapters.
    pub enum TokenStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "token store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "token store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store `candidate` for `user_id` unless a token already exists, and
    /// return whichever token is stored afterwards.
    async fn get_or_create(
        &self,
        user_id: &UserId,
        candidate: &AuthToken,
    ) -> Result<AuthToken, TokenStoreError>;

    /// Map a presented token to the owning user.
    async fn resolve(&self, token: &AuthToken) -> Result<Option<UserProfile>, TokenStoreError>;
}
