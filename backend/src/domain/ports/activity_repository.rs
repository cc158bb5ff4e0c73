//! Port for the append-only activity log.
//!
//! The trait deliberately has no update or delete method.

use async_trait::async_trait;

use crate::domain::{Activity, ActivityId, TicketId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by activity repository adapters.
    pub enum ActivityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "activity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "activity repository query failed: {message}",
        /// The owning ticket vanished before the activity was stored.
        UnknownTicket { ticket_id: String } =>
            "ticket {ticket_id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append an activity. Fails with `UnknownTicket` when the owning ticket
    /// is absent, storing nothing.
    async fn append(&self, activity: &Activity) -> Result<(), ActivityRepositoryError>;

    async fn find_by_id(&self, id: &ActivityId)
    -> Result<Option<Activity>, ActivityRepositoryError>;

    /// Activities of one ticket, oldest first.
    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<Activity>, ActivityRepositoryError>;

    /// Activities of several tickets, oldest first.
    async fn list_for_tickets(
        &self,
        ticket_ids: &[TicketId],
    ) -> Result<Vec<Activity>, ActivityRepositoryError>;

    /// Every activity, oldest first.
    async fn list_all(&self) -> Result<Vec<Activity>, ActivityRepositoryError>;
}
