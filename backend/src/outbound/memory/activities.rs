//! In-memory [`ActivityRepository`].

use async_trait::async_trait;

use crate::domain::ports::{ActivityRepository, ActivityRepositoryError};
use crate::domain::{Activity, ActivityId, TicketId};

use super::InMemoryStore;

fn chronological(mut activities: Vec<Activity>) -> Vec<Activity> {
    // Stable sort keeps insertion order for equal timestamps.
    activities.sort_by_key(Activity::created_at);
    activities
}

#[async_trait]
impl ActivityRepository for InMemoryStore {
    async fn append(&self, activity: &Activity) -> Result<(), ActivityRepositoryError> {
        let mut state = self.state.write().await;
        if !state
            .tickets
            .iter()
            .any(|ticket| ticket.id() == activity.ticket_id())
        {
            return Err(ActivityRepositoryError::unknown_ticket(
                activity.ticket_id().to_string(),
            ));
        }
        state.activities.push(activity.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ActivityId,
    ) -> Result<Option<Activity>, ActivityRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .activities
            .iter()
            .find(|activity| activity.id() == id)
            .cloned())
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let state = self.state.read().await;
        Ok(chronological(
            state
                .activities
                .iter()
                .filter(|activity| activity.ticket_id() == ticket_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_for_tickets(
        &self,
        ticket_ids: &[TicketId],
    ) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let state = self.state.read().await;
        Ok(chronological(
            state
                .activities
                .iter()
                .filter(|activity| ticket_ids.contains(activity.ticket_id()))
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<Activity>, ActivityRepositoryError> {
        let state = self.state.read().await;
        Ok(chronological(state.activities.clone()))
    }
}
