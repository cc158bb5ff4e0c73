//! Port for ticket persistence.
//!
//! Ticket creation and its seed activity are handed to the adapter in one
//! call so both land in a single transaction. Deleting a ticket must also
//! remove its activities; adapters enforce that at the storage layer.

use async_trait::async_trait;

use crate::domain::{Activity, Ticket, TicketFilter, TicketId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ticket repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persist a new ticket together with its seed activity, atomically.
    async fn insert_with_seed(
        &self,
        ticket: &Ticket,
        seed: &Activity,
    ) -> Result<(), TicketRepositoryError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// List tickets matching `filter`, newest first.
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Overwrite the stored ticket. Returns `false` when it no longer exists.
    async fn update(&self, ticket: &Ticket) -> Result<bool, TicketRepositoryError>;

    /// Delete the ticket and its activities. Returns `false` when absent.
    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError>;
}
