//! Append-only audit entries attached to tickets.
//!
//! Activities are immutable once recorded; there is no update or delete
//! operation at any layer. They disappear only when their ticket is deleted.

use chrono::{DateTime, Utc};

use super::validation::required_text;
use super::{ActivityId, ActivityType, FieldError, Ticket, TicketId};

/// Message recorded on the activity seeded with every new ticket.
pub const SEED_ACTIVITY_MESSAGE: &str = "Ticket created";
/// Maximum length of the free-text actor label.
pub const ACTOR_MAX: usize = 100;

/// Validated activity message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityMessage(String);

impl ActivityMessage {
    pub fn new(value: &str) -> Result<Self, FieldError> {
        required_text("message", value, None).map(Self)
    }
}

/// Validated label for whoever performed the activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorLabel(String);

impl ActorLabel {
    pub fn new(value: &str) -> Result<Self, FieldError> {
        required_text("created_by", value, Some(ACTOR_MAX)).map(Self)
    }
}

/// Validated input for an explicitly recorded activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub ticket_id: TicketId,
    pub kind: ActivityType,
    pub message: ActivityMessage,
    pub created_by: ActorLabel,
}

/// Plain field bundle used by storage adapters to rebuild an [`Activity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub ticket_id: TicketId,
    pub kind: ActivityType,
    pub message: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Audit entry belonging to exactly one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    id: ActivityId,
    ticket_id: TicketId,
    kind: ActivityType,
    message: String,
    created_by: String,
    created_at: DateTime<Utc>,
}

impl Activity {
    /// Record an activity from validated input.
    pub fn record(draft: ActivityDraft, now: DateTime<Utc>) -> Self {
        let ActivityDraft {
            ticket_id,
            kind,
            message,
            created_by,
        } = draft;
        Self {
            id: ActivityId::random(),
            ticket_id,
            kind,
            message: message.0,
            created_by: created_by.0,
            created_at: now,
        }
    }

    /// The `comment` entry every ticket starts with, stamped with the
    /// ticket's creation time and attributed to its creator.
    pub fn seed_for(ticket: &Ticket) -> Self {
        Self {
            id: ActivityId::random(),
            ticket_id: *ticket.id(),
            kind: ActivityType::Comment,
            message: SEED_ACTIVITY_MESSAGE.to_owned(),
            created_by: ticket.created_by_name().to_owned(),
            created_at: ticket.created_at(),
        }
    }

    pub fn id(&self) -> &ActivityId {
        &self.id
    }

    pub fn ticket_id(&self) -> &TicketId {
        &self.ticket_id
    }

    pub fn kind(&self) -> ActivityType {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl From<ActivityRecord> for Activity {
    fn from(record: ActivityRecord) -> Self {
        let ActivityRecord {
            id,
            ticket_id,
            kind,
            message,
            created_by,
            created_at,
        } = record;
        Self {
            id,
            ticket_id,
            kind,
            message,
            created_by,
            created_at,
        }
    }
}
