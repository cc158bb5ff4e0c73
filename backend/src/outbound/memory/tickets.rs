//! In-memory [`TicketRepository`].

use async_trait::async_trait;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{Activity, Ticket, TicketFilter, TicketId};

use super::InMemoryStore;

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn insert_with_seed(
        &self,
        ticket: &Ticket,
        seed: &Activity,
    ) -> Result<(), TicketRepositoryError> {
        if seed.ticket_id() != ticket.id() {
            return Err(TicketRepositoryError::query(
                "seed activity belongs to a different ticket",
            ));
        }
        let mut state = self.state.write().await;
        if state.tickets.iter().any(|stored| stored.id() == ticket.id()) {
            return Err(TicketRepositoryError::query(format!(
                "ticket {} already exists",
                ticket.id()
            )));
        }
        state.tickets.push(ticket.clone());
        state.activities.push(seed.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let state = self.state.read().await;
        Ok(state.tickets.iter().find(|ticket| ticket.id() == id).cloned())
    }

    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let state = self.state.read().await;
        // Newest insertions first so equal timestamps keep recency order.
        let mut tickets: Vec<Ticket> = state
            .tickets
            .iter()
            .rev()
            .filter(|ticket| filter.matches(ticket))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(tickets)
    }

    async fn update(&self, ticket: &Ticket) -> Result<bool, TicketRepositoryError> {
        let mut state = self.state.write().await;
        match state
            .tickets
            .iter_mut()
            .find(|stored| stored.id() == ticket.id())
        {
            Some(stored) => {
                *stored = ticket.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError> {
        let mut state = self.state.write().await;
        let before = state.tickets.len();
        state.tickets.retain(|ticket| ticket.id() != id);
        if state.tickets.len() == before {
            return Ok(false);
        }
        state.activities.retain(|activity| activity.ticket_id() != id);
        Ok(true)
    }
}
