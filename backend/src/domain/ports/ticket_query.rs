//! Driving port for ticket reads.

use async_trait::async_trait;

use crate::domain::{Activity, Error, TicketDetails, TicketFilter, TicketId};

#[async_trait]
pub trait TicketQuery: Send + Sync {
    /// Tickets matching `filter`, newest first, each with its activities.
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<TicketDetails>, Error>;

    async fn get(&self, id: &TicketId) -> Result<TicketDetails, Error>;

    /// Chronological audit trail of one ticket.
    async fn activities(&self, id: &TicketId) -> Result<Vec<Activity>, Error>;
}
