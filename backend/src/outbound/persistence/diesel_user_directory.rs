//! PostgreSQL-backed `UserDirectory` implementation using Diesel ORM.
//!
//! Email lookups compare `lower(email)` so sign-in is case-insensitive.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{DirectoryUser, UserId, UserProfile};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{directory_user_from_row, profile_from_row};
use super::schema::users;

diesel::define_sql_function! {
    /// SQL `lower()`.
    fn lower(value: Text) -> Text;
}

/// Diesel-backed implementation of the `UserDirectory` port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a directory user. Used by the `create-user` tool.
    ///
    /// # Errors
    ///
    /// Returns a query error when the email or username is already taken.
    pub async fn register(&self, user: &DirectoryUser) -> Result<(), UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let profile = &user.profile;

        diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: *profile.id.as_uuid(),
                username: &profile.username,
                email: &profile.email,
                first_name: &profile.first_name,
                last_name: &profile.last_name,
                password_hash: &user.password_hash,
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    map_basic_pool_error(error, UserDirectoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    map_basic_diesel_error(
        error,
        UserDirectoryError::query,
        UserDirectoryError::connection,
    )
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<DirectoryUser>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(lower(users::email).eq(email.to_lowercase()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(directory_user_from_row))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(profile_from_row))
    }
}
