//! Conversions between Diesel rows and domain records.
//!
//! Enum columns are stored as their lowercase names; a value that no longer
//! parses is reported as a message the caller wraps in its query error.

use crate::domain::{
    Activity, ActivityId, ActivityRecord, ActivityType, DirectoryUser, Ticket, TicketId,
    TicketPriority, TicketRecord, TicketStatus, UserId, UserProfile,
};

use super::models::{ActivityRow, NewActivityRow, NewTicketRow, TicketRow, TicketUpdate, UserRow};

pub(crate) fn ticket_from_row(row: TicketRow) -> Result<Ticket, String> {
    let status = row
        .status
        .parse::<TicketStatus>()
        .map_err(|err| format!("corrupted ticket status in database: {err}"))?;
    let priority = row
        .priority
        .parse::<TicketPriority>()
        .map_err(|err| format!("corrupted ticket priority in database: {err}"))?;
    Ok(Ticket::from(TicketRecord {
        id: TicketId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        status,
        priority,
        created_by_name: row.created_by_name,
        created_by_email: row.created_by_email,
        assigned_to: row.assigned_to.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub(crate) fn new_ticket_row(ticket: &Ticket) -> NewTicketRow<'_> {
    NewTicketRow {
        id: *ticket.id().as_uuid(),
        title: ticket.title(),
        description: ticket.description(),
        status: ticket.status().as_str(),
        priority: ticket.priority().as_str(),
        created_by_name: ticket.created_by_name(),
        created_by_email: ticket.created_by_email(),
        assigned_to: ticket.assigned_to().map(|id| *id.as_uuid()),
        created_at: ticket.created_at(),
        updated_at: ticket.updated_at(),
    }
}

pub(crate) fn ticket_update(ticket: &Ticket) -> TicketUpdate<'_> {
    TicketUpdate {
        title: ticket.title(),
        description: ticket.description(),
        status: ticket.status().as_str(),
        priority: ticket.priority().as_str(),
        created_by_name: ticket.created_by_name(),
        created_by_email: ticket.created_by_email(),
        assigned_to: ticket.assigned_to().map(|id| *id.as_uuid()),
        updated_at: ticket.updated_at(),
    }
}

pub(crate) fn activity_from_row(row: ActivityRow) -> Result<Activity, String> {
    let kind = row
        .activity_type
        .parse::<ActivityType>()
        .map_err(|err| format!("corrupted activity type in database: {err}"))?;
    Ok(Activity::from(ActivityRecord {
        id: ActivityId::from_uuid(row.id),
        ticket_id: TicketId::from_uuid(row.ticket_id),
        kind,
        message: row.message,
        created_by: row.created_by,
        created_at: row.created_at,
    }))
}

pub(crate) fn new_activity_row(activity: &Activity) -> NewActivityRow<'_> {
    NewActivityRow {
        id: *activity.id().as_uuid(),
        ticket_id: *activity.ticket_id().as_uuid(),
        activity_type: activity.kind().as_str(),
        message: activity.message(),
        created_by: activity.created_by(),
        created_at: activity.created_at(),
    }
}

pub(crate) fn profile_from_row(row: UserRow) -> UserProfile {
    directory_user_from_row(row).profile
}

pub(crate) fn directory_user_from_row(row: UserRow) -> DirectoryUser {
    DirectoryUser {
        profile: UserProfile {
            id: UserId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
        },
        password_hash: row.password_hash,
    }
}
