//! Ticket service orchestrating the ticket store and activity log.
//!
//! Every ticket is created together with its seed activity, so a stored
//! ticket always has at least one audit entry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    ActivityRepository, ActivityRepositoryError, TicketCommand, TicketQuery, TicketRepository,
    TicketRepositoryError, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    Activity, Error, FieldError, FieldProblem, Ticket, TicketChanges, TicketDetails, TicketDraft,
    TicketFilter, TicketId, UserId,
};

/// Ticket service implementing the ticket driving ports.
#[derive(Clone)]
pub struct TicketService<T, A, U> {
    tickets: Arc<T>,
    activities: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<T, A, U> TicketService<T, A, U> {
    /// Create a new service over the given stores and clock.
    pub fn new(tickets: Arc<T>, activities: Arc<A>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets,
            activities,
            users,
            clock,
        }
    }
}

pub(crate) fn map_ticket_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketRepositoryError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
    }
}

pub(crate) fn map_activity_error(error: ActivityRepositoryError) -> Error {
    match error {
        ActivityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("activity repository unavailable: {message}"))
        }
        ActivityRepositoryError::Query { message } => {
            Error::internal(format!("activity repository error: {message}"))
        }
        ActivityRepositoryError::UnknownTicket { .. } => {
            FieldError::new("ticket", FieldProblem::UnknownTicket).into()
        }
    }
}

pub(crate) fn ticket_not_found(id: &TicketId) -> Error {
    Error::not_found("Ticket not found.").with_details(json!({ "id": id.to_string() }))
}

impl<T, A, U> TicketService<T, A, U>
where
    T: TicketRepository,
    A: ActivityRepository,
    U: UserDirectory,
{
    fn map_directory_error(error: UserDirectoryError) -> Error {
        match error {
            UserDirectoryError::Connection { message } => {
                Error::service_unavailable(format!("user directory unavailable: {message}"))
            }
            UserDirectoryError::Query { message } => {
                Error::internal(format!("user directory error: {message}"))
            }
        }
    }

    async fn ensure_assignee_exists(&self, assignee: Option<&UserId>) -> Result<(), Error> {
        let Some(user_id) = assignee else {
            return Ok(());
        };
        let found = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_directory_error)?;
        match found {
            Some(_) => Ok(()),
            None => Err(FieldError::new("assigned_to", FieldProblem::UnknownUser).into()),
        }
    }

    async fn load_ticket(&self, id: &TicketId) -> Result<Ticket, Error> {
        self.tickets
            .find_by_id(id)
            .await
            .map_err(map_ticket_error)?
            .ok_or_else(|| ticket_not_found(id))
    }

    async fn with_activities(&self, ticket: Ticket) -> Result<TicketDetails, Error> {
        let activities = self
            .activities
            .list_for_ticket(ticket.id())
            .await
            .map_err(map_activity_error)?;
        Ok(TicketDetails { ticket, activities })
    }
}

#[async_trait]
impl<T, A, U> TicketCommand for TicketService<T, A, U>
where
    T: TicketRepository,
    A: ActivityRepository,
    U: UserDirectory,
{
    async fn create(&self, draft: TicketDraft) -> Result<TicketDetails, Error> {
        self.ensure_assignee_exists(draft.assigned_to.as_ref())
            .await?;

        let ticket = Ticket::open(draft, self.clock.utc());
        let seed = ticket.seed_activity();
        self.tickets
            .insert_with_seed(&ticket, &seed)
            .await
            .map_err(map_ticket_error)?;
        info!(ticket_id = %ticket.id(), priority = %ticket.priority(), "ticket created");

        Ok(TicketDetails {
            ticket,
            activities: vec![seed],
        })
    }

    async fn update(&self, id: &TicketId, changes: TicketChanges) -> Result<TicketDetails, Error> {
        let mut ticket = self.load_ticket(id).await?;
        self.ensure_assignee_exists(changes.assignee()).await?;

        ticket.apply(changes, self.clock.utc());
        let stored = self
            .tickets
            .update(&ticket)
            .await
            .map_err(map_ticket_error)?;
        if !stored {
            return Err(ticket_not_found(id));
        }
        info!(ticket_id = %id, status = %ticket.status(), "ticket updated");

        self.with_activities(ticket).await
    }

    async fn delete(&self, id: &TicketId) -> Result<(), Error> {
        let deleted = self.tickets.delete(id).await.map_err(map_ticket_error)?;
        if !deleted {
            return Err(ticket_not_found(id));
        }
        info!(ticket_id = %id, "ticket deleted");
        Ok(())
    }
}

#[async_trait]
impl<T, A, U> TicketQuery for TicketService<T, A, U>
where
    T: TicketRepository,
    A: ActivityRepository,
    U: UserDirectory,
{
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<TicketDetails>, Error> {
        let tickets = self.tickets.list(filter).await.map_err(map_ticket_error)?;
        if tickets.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<TicketId> = tickets.iter().map(|ticket| *ticket.id()).collect();
        let mut grouped: HashMap<TicketId, Vec<Activity>> = HashMap::new();
        for activity in self
            .activities
            .list_for_tickets(&ids)
            .await
            .map_err(map_activity_error)?
        {
            grouped
                .entry(*activity.ticket_id())
                .or_default()
                .push(activity);
        }

        Ok(tickets
            .into_iter()
            .map(|ticket| {
                let activities = grouped.remove(ticket.id()).unwrap_or_default();
                TicketDetails { ticket, activities }
            })
            .collect())
    }

    async fn get(&self, id: &TicketId) -> Result<TicketDetails, Error> {
        let ticket = self.load_ticket(id).await?;
        self.with_activities(ticket).await
    }

    async fn activities(&self, id: &TicketId) -> Result<Vec<Activity>, Error> {
        let ticket = self.load_ticket(id).await?;
        self.activities
            .list_for_ticket(ticket.id())
            .await
            .map_err(map_activity_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockActivityRepository, MockTicketRepository, MockUserDirectory};
    use crate::domain::{
        ActivityType, CreatorName, ErrorCode, SEED_ACTIVITY_MESSAGE, TicketDescription,
        TicketPriority, TicketStatus, TicketTitle, UserProfile, creator_email,
    };
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockall::predicate::always;
    use rstest::rstest;

    struct FixtureClock(DateTime<Utc>);

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid time")
    }

    fn draft(assigned_to: Option<UserId>) -> TicketDraft {
        TicketDraft {
            title: TicketTitle::new("Printer broken").expect("title"),
            description: TicketDescription::new("Paper jam").expect("description"),
            status: TicketStatus::default(),
            priority: TicketPriority::default(),
            created_by_name: CreatorName::new("Jo").expect("name"),
            created_by_email: creator_email("jo@example.com").expect("email"),
            assigned_to,
        }
    }

    fn make_service(
        tickets: MockTicketRepository,
        activities: MockActivityRepository,
        users: MockUserDirectory,
    ) -> TicketService<MockTicketRepository, MockActivityRepository, MockUserDirectory> {
        TicketService::new(
            Arc::new(tickets),
            Arc::new(activities),
            Arc::new(users),
            Arc::new(FixtureClock(now())),
        )
    }

    #[tokio::test]
    async fn create_persists_ticket_with_seed_activity() {
        let mut tickets = MockTicketRepository::new();
        tickets
            .expect_insert_with_seed()
            .withf(|ticket, seed| {
                seed.ticket_id() == ticket.id()
                    && seed.kind() == ActivityType::Comment
                    && seed.message() == SEED_ACTIVITY_MESSAGE
                    && seed.created_by() == ticket.created_by_name()
            })
            .times(1)
            .return_once(|_, _| Ok(()));
        let service = make_service(
            tickets,
            MockActivityRepository::new(),
            MockUserDirectory::new(),
        );

        let details = service.create(draft(None)).await.expect("create succeeds");

        assert_eq!(details.ticket.status(), TicketStatus::New);
        assert_eq!(details.ticket.priority(), TicketPriority::Medium);
        assert_eq!(details.ticket.created_at(), now());
        assert_eq!(details.activities.len(), 1);
        assert_eq!(details.activities[0].created_by(), "Jo");
    }

    #[tokio::test]
    async fn create_rejects_unknown_assignee_before_writing() {
        let mut tickets = MockTicketRepository::new();
        tickets.expect_insert_with_seed().never();
        let mut users = MockUserDirectory::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));
        let service = make_service(tickets, MockActivityRepository::new(), users);

        let err = service
            .create(draft(Some(UserId::random())))
            .await
            .expect_err("unknown assignee");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "assigned_to", "code": "unknown_user" }))
        );
    }

    #[tokio::test]
    async fn create_accepts_known_assignee() {
        let assignee = UserId::random();
        let mut users = MockUserDirectory::new();
        users.expect_find_by_id().times(1).return_once(move |id| {
            Ok(Some(UserProfile {
                id: *id,
                username: "agent".to_owned(),
                email: "agent@example.com".to_owned(),
                first_name: String::new(),
                last_name: String::new(),
            }))
        });
        let mut tickets = MockTicketRepository::new();
        tickets
            .expect_insert_with_seed()
            .times(1)
            .return_once(|_, _| Ok(()));
        let service = make_service(tickets, MockActivityRepository::new(), users);

        let details = service
            .create(draft(Some(assignee)))
            .await
            .expect("create succeeds");

        assert_eq!(details.ticket.assigned_to(), Some(&assignee));
    }

    #[rstest]
    #[case::unreachable(
        TicketRepositoryError::connection("refused"),
        ErrorCode::ServiceUnavailable
    )]
    #[case::rolled_back(
        TicketRepositoryError::query("seed insert failed"),
        ErrorCode::InternalError
    )]
    #[tokio::test]
    async fn create_surfaces_store_failures(
        #[case] failure: TicketRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut tickets = MockTicketRepository::new();
        tickets
            .expect_insert_with_seed()
            .times(1)
            .return_once(move |_, _| Err(failure));
        let service = make_service(
            tickets,
            MockActivityRepository::new(),
            MockUserDirectory::new(),
        );

        let err = service.create(draft(None)).await.expect_err("store fails");

        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn activities_for_missing_ticket_is_not_found() {
        let mut tickets = MockTicketRepository::new();
        tickets
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));
        let mut activities = MockActivityRepository::new();
        activities.expect_list_for_ticket().never();
        let service = make_service(tickets, activities, MockUserDirectory::new());

        let err = service
            .activities(&TicketId::random())
            .await
            .expect_err("missing ticket");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_refreshes_timestamp_and_returns_activities() {
        let created = Ticket::open(
            draft(None),
            Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0)
                .single()
                .expect("valid time"),
        );
        let id = *created.id();
        let seed = created.seed_activity();
        let mut tickets = MockTicketRepository::new();
        tickets
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(created)));
        tickets
            .expect_update()
            .withf(|ticket| ticket.status() == TicketStatus::Resolved)
            .times(1)
            .return_once(|_| Ok(true));
        let mut activities = MockActivityRepository::new();
        activities
            .expect_list_for_ticket()
            .with(always())
            .times(1)
            .return_once(move |_| Ok(vec![seed]));
        let service = make_service(tickets, activities, MockUserDirectory::new());
        let changes = TicketChanges {
            status: Some(TicketStatus::Resolved),
            ..TicketChanges::default()
        };

        let details = service.update(&id, changes).await.expect("update succeeds");

        assert_eq!(details.ticket.updated_at(), now());
        assert_eq!(details.activities.len(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_ticket_is_not_found() {
        let mut tickets = MockTicketRepository::new();
        tickets
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));
        tickets.expect_update().never();
        let service = make_service(
            tickets,
            MockActivityRepository::new(),
            MockUserDirectory::new(),
        );

        let err = service
            .update(&TicketId::random(), TicketChanges::default())
            .await
            .expect_err("missing ticket");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_of_missing_ticket_is_not_found() {
        let mut tickets = MockTicketRepository::new();
        tickets.expect_delete().times(1).return_once(|_| Ok(false));
        let service = make_service(
            tickets,
            MockActivityRepository::new(),
            MockUserDirectory::new(),
        );

        let err = service
            .delete(&TicketId::random())
            .await
            .expect_err("missing ticket");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_attaches_activities_to_their_tickets() {
        let first = Ticket::open(draft(None), now());
        let second = Ticket::open(draft(None), now());
        let first_seed = first.seed_activity();
        let second_seed = second.seed_activity();
        let listed = vec![second.clone(), first.clone()];
        let mut tickets = MockTicketRepository::new();
        tickets
            .expect_list()
            .times(1)
            .return_once(move |_| Ok(listed));
        let mut activities = MockActivityRepository::new();
        activities
            .expect_list_for_tickets()
            .withf(|ids| ids.len() == 2)
            .times(1)
            .return_once(move |_| Ok(vec![first_seed, second_seed]));
        let service = make_service(tickets, activities, MockUserDirectory::new());

        let details = service
            .list(&TicketFilter::default())
            .await
            .expect("list succeeds");

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].ticket.id(), second.id());
        assert_eq!(details[0].activities[0].ticket_id(), second.id());
        assert_eq!(details[1].activities[0].ticket_id(), first.id());
    }
}
