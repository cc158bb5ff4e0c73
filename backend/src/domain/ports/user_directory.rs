//! Port onto the external user directory.

use async_trait::async_trait;

use crate::domain::{DirectoryUser, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look a user up by email, ignoring case.
    async fn find_by_email(&self, email: &str)
    -> Result<Option<DirectoryUser>, UserDirectoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError>;
}
