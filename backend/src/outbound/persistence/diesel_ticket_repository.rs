//! PostgreSQL-backed `TicketRepository` implementation using Diesel ORM.
//!
//! Ticket creation writes the ticket row and its seed activity in a single
//! transaction. Deleting a ticket relies on the `ON DELETE CASCADE` foreign
//! key to remove its activities.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{Activity, Ticket, TicketFilter, TicketId};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::TicketRow;
use super::pool::{DbPool, PoolError};
use super::row_mapping::{new_activity_row, new_ticket_row, ticket_from_row, ticket_update};
use super::schema::{activities, tickets};

/// Diesel-backed implementation of the `TicketRepository` port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TicketRepositoryError {
    map_basic_pool_error(error, TicketRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TicketRepositoryError {
    map_basic_diesel_error(
        error,
        TicketRepositoryError::query,
        TicketRepositoryError::connection,
    )
}

fn to_ticket(row: TicketRow) -> Result<Ticket, TicketRepositoryError> {
    ticket_from_row(row).map_err(TicketRepositoryError::query)
}

/// Escape `LIKE` metacharacters so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn insert_with_seed(
        &self,
        ticket: &Ticket,
        seed: &Activity,
    ) -> Result<(), TicketRepositoryError> {
        let ticket_row = new_ticket_row(ticket);
        let activity_row = new_activity_row(seed);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(tickets::table)
                    .values(&ticket_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(activities::table)
                    .values(&activity_row)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = tickets::table
            .find(*id.as_uuid())
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_ticket).transpose()
    }

    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = tickets::table.select(TicketRow::as_select()).into_boxed();
        if let Some(status) = filter.status() {
            query = query.filter(tickets::status.eq(status.as_str()));
        }
        if let Some(priority) = filter.priority() {
            query = query.filter(tickets::priority.eq(priority.as_str()));
        }
        if let Some(term) = filter.search() {
            let pattern = like_pattern(term);
            query = query.filter(
                tickets::title
                    .ilike(pattern.clone())
                    .or(tickets::description.ilike(pattern.clone()))
                    .or(tickets::created_by_name.ilike(pattern)),
            );
        }

        let rows: Vec<TicketRow> = query
            .order((tickets::created_at.desc(), tickets::seq.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(to_ticket).collect()
    }

    async fn update(&self, ticket: &Ticket) -> Result<bool, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(tickets::table.find(*ticket.id().as_uuid()))
            .set(&ticket_update(ticket))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(tickets::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("printer", "%printer%")]
    #[case("100%", "%100\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("C:\\temp", "%C:\\\\temp%")]
    fn like_pattern_escapes_metacharacters(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(term), expected);
    }

    #[rstest]
    fn pool_failures_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, TicketRepositoryError::connection("timed out"));
    }
}
