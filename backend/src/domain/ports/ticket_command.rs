//! Driving port for ticket mutations.

use async_trait::async_trait;

use crate::domain::{Error, TicketChanges, TicketDetails, TicketDraft, TicketId};

#[async_trait]
pub trait TicketCommand: Send + Sync {
    /// Open a ticket and its seed activity.
    async fn create(&self, draft: TicketDraft) -> Result<TicketDetails, Error>;

    /// Apply a partial update.
    async fn update(&self, id: &TicketId, changes: TicketChanges) -> Result<TicketDetails, Error>;

    /// Delete a ticket and, through the store, its activities.
    async fn delete(&self, id: &TicketId) -> Result<(), Error>;
}
