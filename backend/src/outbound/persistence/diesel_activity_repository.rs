//! PostgreSQL-backed `ActivityRepository` implementation using Diesel ORM.
//!
//! Rows are only ever inserted or read. The `ticket_id` foreign key turns an
//! append for a missing ticket into `UnknownTicket`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ActivityRepository, ActivityRepositoryError};
use crate::domain::{Activity, ActivityId, TicketId};

use super::error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::ActivityRow;
use super::pool::{DbPool, PoolError};
use super::row_mapping::{activity_from_row, new_activity_row};
use super::schema::activities;

/// Diesel-backed implementation of the `ActivityRepository` port.
#[derive(Clone)]
pub struct DieselActivityRepository {
    pool: DbPool,
}

impl DieselActivityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ActivityRepositoryError {
    map_basic_pool_error(error, ActivityRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ActivityRepositoryError {
    map_basic_diesel_error(
        error,
        ActivityRepositoryError::query,
        ActivityRepositoryError::connection,
    )
}

fn to_activities(rows: Vec<ActivityRow>) -> Result<Vec<Activity>, ActivityRepositoryError> {
    rows.into_iter()
        .map(|row| activity_from_row(row).map_err(ActivityRepositoryError::query))
        .collect()
}

#[async_trait]
impl ActivityRepository for DieselActivityRepository {
    async fn append(&self, activity: &Activity) -> Result<(), ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(activities::table)
            .values(&new_activity_row(activity))
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    ActivityRepositoryError::unknown_ticket(activity.ticket_id().to_string())
                } else {
                    map_diesel_error(err)
                }
            })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ActivityId,
    ) -> Result<Option<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = activities::table
            .find(*id.as_uuid())
            .select(ActivityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| activity_from_row(row).map_err(ActivityRepositoryError::query))
            .transpose()
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = activities::table
            .filter(activities::ticket_id.eq(ticket_id.as_uuid()))
            .order((activities::created_at.asc(), activities::seq.asc()))
            .select(ActivityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_activities(rows)
    }

    async fn list_for_tickets(
        &self,
        ticket_ids: &[TicketId],
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        if ticket_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ticket_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = activities::table
            .filter(activities::ticket_id.eq_any(ids))
            .order((activities::created_at.asc(), activities::seq.asc()))
            .select(ActivityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_activities(rows)
    }

    async fn list_all(&self) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = activities::table
            .order((activities::created_at.asc(), activities::seq.asc()))
            .select(ActivityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_activities(rows)
    }
}
