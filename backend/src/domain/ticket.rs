//! Ticket aggregate: validated input, the entity itself, and list filters.
//!
//! Tickets are created from a [`TicketDraft`], mutated with [`TicketChanges`]
//! and always carry `created_at <= updated_at`.

use chrono::{DateTime, Utc};

use super::validation::required_text;
use super::{
    Activity, EmailAddress, FieldError, FieldProblem, TicketId, TicketPriority, TicketStatus,
    UserId,
};

/// Maximum length of a ticket title.
pub const TITLE_MAX: usize = 200;
/// Maximum length of the free-text creator name.
pub const CREATOR_NAME_MAX: usize = 100;

/// Validated ticket title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTitle(String);

impl TicketTitle {
    pub fn new(value: &str) -> Result<Self, FieldError> {
        required_text("title", value, Some(TITLE_MAX)).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated free-text ticket description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDescription(String);

impl TicketDescription {
    pub fn new(value: &str) -> Result<Self, FieldError> {
        required_text("description", value, None).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated display name of whoever opened the ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorName(String);

impl CreatorName {
    pub fn new(value: &str) -> Result<Self, FieldError> {
        required_text("created_by_name", value, Some(CREATOR_NAME_MAX)).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse the creator email, attributing failures to `created_by_email`.
pub fn creator_email(value: &str) -> Result<EmailAddress, FieldError> {
    EmailAddress::new(value).map_err(|err| {
        let problem = match err {
            super::EmailValidationError::Empty => FieldProblem::Empty,
            super::EmailValidationError::TooLong { max } => FieldProblem::TooLong { max },
            super::EmailValidationError::Malformed => FieldProblem::InvalidEmail,
        };
        FieldError::new("created_by_email", problem)
    })
}

/// Validated input for ticket creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_by_name: CreatorName,
    pub created_by_email: EmailAddress,
    pub assigned_to: Option<UserId>,
}

/// Validated partial update. `None` leaves a field untouched.
///
/// `assigned_to` is doubly optional: `Some(None)` clears the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketChanges {
    pub title: Option<TicketTitle>,
    pub description: Option<TicketDescription>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub created_by_name: Option<CreatorName>,
    pub created_by_email: Option<EmailAddress>,
    pub assigned_to: Option<Option<UserId>>,
}

impl TicketChanges {
    /// Check that every field required on creation is present, as a full
    /// replacement demands.
    pub fn require_complete(&self) -> Result<(), FieldError> {
        if self.title.is_none() {
            return Err(FieldError::missing("title"));
        }
        if self.description.is_none() {
            return Err(FieldError::missing("description"));
        }
        if self.created_by_name.is_none() {
            return Err(FieldError::missing("created_by_name"));
        }
        if self.created_by_email.is_none() {
            return Err(FieldError::missing("created_by_email"));
        }
        Ok(())
    }

    /// User newly assigned by this change, if any.
    pub fn assignee(&self) -> Option<&UserId> {
        self.assigned_to.as_ref().and_then(Option::as_ref)
    }
}

/// Plain field bundle used by storage adapters to rebuild a [`Ticket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_by_name: String,
    pub created_by_email: String,
    pub assigned_to: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Support ticket.
///
/// ## Invariants
/// - `id` and `created_at` never change after creation.
/// - `created_at <= updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: TicketId,
    title: String,
    description: String,
    status: TicketStatus,
    priority: TicketPriority,
    created_by_name: String,
    created_by_email: String,
    assigned_to: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Open a new ticket with a fresh identifier.
    pub fn open(draft: TicketDraft, now: DateTime<Utc>) -> Self {
        let TicketDraft {
            title,
            description,
            status,
            priority,
            created_by_name,
            created_by_email,
            assigned_to,
        } = draft;
        Self {
            id: TicketId::random(),
            title: title.0,
            description: description.0,
            status,
            priority,
            created_by_name: created_by_name.0,
            created_by_email: created_by_email.into(),
            assigned_to,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and refresh `updated_at`.
    pub fn apply(&mut self, changes: TicketChanges, now: DateTime<Utc>) {
        let TicketChanges {
            title,
            description,
            status,
            priority,
            created_by_name,
            created_by_email,
            assigned_to,
        } = changes;
        if let Some(title) = title {
            self.title = title.0;
        }
        if let Some(description) = description {
            self.description = description.0;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(name) = created_by_name {
            self.created_by_name = name.0;
        }
        if let Some(email) = created_by_email {
            self.created_by_email = email.into();
        }
        if let Some(assigned_to) = assigned_to {
            self.assigned_to = assigned_to;
        }
        self.updated_at = now.max(self.created_at);
    }

    /// Seed audit entry written alongside the ticket on creation.
    pub fn seed_activity(&self) -> Activity {
        Activity::seed_for(self)
    }

    pub fn id(&self) -> &TicketId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn priority(&self) -> TicketPriority {
        self.priority
    }

    pub fn created_by_name(&self) -> &str {
        &self.created_by_name
    }

    pub fn created_by_email(&self) -> &str {
        &self.created_by_email
    }

    pub fn assigned_to(&self) -> Option<&UserId> {
        self.assigned_to.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<TicketRecord> for Ticket {
    fn from(record: TicketRecord) -> Self {
        let TicketRecord {
            id,
            title,
            description,
            status,
            priority,
            created_by_name,
            created_by_email,
            assigned_to,
            created_at,
            updated_at,
        } = record;
        Self {
            id,
            title,
            description,
            status,
            priority,
            created_by_name,
            created_by_email,
            assigned_to,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }
}

/// Ticket together with its chronological audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetails {
    pub ticket: Ticket,
    pub activities: Vec<Activity>,
}

/// Optional list filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    status: Option<TicketStatus>,
    priority: Option<TicketPriority>,
    search: Option<String>,
}

impl TicketFilter {
    /// Build a filter; a blank search term is treated as absent.
    pub fn new(
        status: Option<TicketStatus>,
        priority: Option<TicketPriority>,
        search: Option<&str>,
    ) -> Self {
        let search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_owned);
        Self {
            status,
            priority,
            search,
        }
    }

    pub fn status(&self) -> Option<TicketStatus> {
        self.status
    }

    pub fn priority(&self) -> Option<TicketPriority> {
        self.priority
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Evaluate the filter in memory. Search is a case-insensitive substring
    /// match on title, description, and creator name.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.status.is_some_and(|status| status != ticket.status) {
            return false;
        }
        if self
            .priority
            .is_some_and(|priority| priority != ticket.priority)
        {
            return false;
        }
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        let needle = term.to_lowercase();
        [
            ticket.title.as_str(),
            ticket.description.as_str(),
            ticket.created_by_name.as_str(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}
