//! PostgreSQL-backed `TokenStore` implementation using Diesel ORM.
//!
//! `auth_tokens.user_id` is unique, so issuing is an insert that does nothing
//! on conflict followed by a read of whichever key won.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TokenStore, TokenStoreError};
use crate::domain::{AuthToken, UserId, UserProfile};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewAuthTokenRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::profile_from_row;
use super::schema::{auth_tokens, users};

/// Diesel-backed implementation of the `TokenStore` port.
#[derive(Clone)]
pub struct DieselTokenStore {
    pool: DbPool,
}

impl DieselTokenStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenStoreError {
    map_basic_pool_error(error, TokenStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TokenStoreError {
    map_basic_diesel_error(error, TokenStoreError::query, TokenStoreError::connection)
}

#[async_trait]
impl TokenStore for DieselTokenStore {
    async fn get_or_create(
        &self,
        user_id: &UserId,
        candidate: &AuthToken,
    ) -> Result<AuthToken, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(auth_tokens::table)
            .values(&NewAuthTokenRow {
                key: candidate.as_str(),
                user_id: *user_id.as_uuid(),
            })
            .on_conflict(auth_tokens::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let key: String = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user_id.as_uuid()))
            .select(auth_tokens::key)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(AuthToken::new(key))
    }

    async fn resolve(&self, token: &AuthToken) -> Result<Option<UserProfile>, TokenStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::key.eq(token.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(profile_from_row))
    }
}
