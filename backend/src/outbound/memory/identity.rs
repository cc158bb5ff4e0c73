//! In-memory [`UserDirectory`] and [`TokenStore`].

use async_trait::async_trait;

use crate::domain::ports::{TokenStore, TokenStoreError, UserDirectory, UserDirectoryError};
use crate::domain::{AuthToken, DirectoryUser, UserId, UserProfile};

use super::InMemoryStore;

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<DirectoryUser>, UserDirectoryError> {
        let needle = email.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|user| user.profile.email.to_lowercase() == needle)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|user| &user.profile.id == id)
            .map(|user| user.profile.clone()))
    }
}

#[async_trait]
impl TokenStore for InMemoryStore {
    async fn get_or_create(
        &self,
        user_id: &UserId,
        candidate: &AuthToken,
    ) -> Result<AuthToken, TokenStoreError> {
        let mut state = self.state.write().await;
        Ok(state
            .tokens
            .entry(*user_id)
            .or_insert_with(|| candidate.clone())
            .clone())
    }

    async fn resolve(&self, token: &AuthToken) -> Result<Option<UserProfile>, TokenStoreError> {
        let state = self.state.read().await;
        let Some(user_id) = state
            .tokens
            .iter()
            .find_map(|(user_id, stored)| (stored == token).then_some(*user_id))
        else {
            return Ok(None);
        };
        Ok(state
            .users
            .iter()
            .find(|user| user.profile.id == user_id)
            .map(|user| user.profile.clone()))
    }
}
