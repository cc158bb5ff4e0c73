//! Activity log service.
//!
//! Explicit activities may only be appended to tickets that exist; nothing is
//! stored otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{ActivityCommand, ActivityQuery, ActivityRepository, TicketRepository};
use crate::domain::ticket_service::{map_activity_error, map_ticket_error};
use crate::domain::{Activity, ActivityDraft, ActivityId, Error, FieldError, FieldProblem};

/// Activity service implementing the activity driving ports.
#[derive(Clone)]
pub struct ActivityService<T, A> {
    tickets: Arc<T>,
    activities: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<T, A> ActivityService<T, A> {
    pub fn new(tickets: Arc<T>, activities: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets,
            activities,
            clock,
        }
    }
}

#[async_trait]
impl<T, A> ActivityCommand for ActivityService<T, A>
where
    T: TicketRepository,
    A: ActivityRepository,
{
    async fn record(&self, draft: ActivityDraft) -> Result<Activity, Error> {
        let ticket = self
            .tickets
            .find_by_id(&draft.ticket_id)
            .await
            .map_err(map_ticket_error)?;
        if ticket.is_none() {
            return Err(FieldError::new("ticket", FieldProblem::UnknownTicket).into());
        }

        let activity = Activity::record(draft, self.clock.utc());
        self.activities
            .append(&activity)
            .await
            .map_err(map_activity_error)?;
        info!(
            activity_id = %activity.id(),
            ticket_id = %activity.ticket_id(),
            kind = %activity.kind(),
            "activity recorded"
        );
        Ok(activity)
    }
}

#[async_trait]
impl<T, A> ActivityQuery for ActivityService<T, A>
where
    T: TicketRepository,
    A: ActivityRepository,
{
    async fn list(&self) -> Result<Vec<Activity>, Error> {
        self.activities.list_all().await.map_err(map_activity_error)
    }

    async fn get(&self, id: &ActivityId) -> Result<Activity, Error> {
        self.activities
            .find_by_id(id)
            .await
            .map_err(map_activity_error)?
            .ok_or_else(|| {
                Error::not_found("Activity not found.")
                    .with_details(json!({ "id": id.to_string() }))
            })
    }
}
