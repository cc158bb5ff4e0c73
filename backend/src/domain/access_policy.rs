//! Per-operation access rules for anonymous and authenticated callers.
//!
//! | Operation                 | Anonymous | Authenticated |
//! |---------------------------|-----------|---------------|
//! | create ticket             | allow     | allow         |
//! | read ticket(s)            | allow     | allow         |
//! | update / delete ticket    | deny      | allow         |
//! | create activity           | deny      | allow         |
//! | read activity/activities  | allow     | allow         |

use std::fmt;

use super::{Error, UserProfile};

/// Message returned when an anonymous caller hits a protected operation.
pub const AUTHENTICATION_REQUIRED: &str = "Authentication credentials were not provided.";

/// Operations guarded by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateTicket,
    ReadTickets,
    UpdateTicket,
    DeleteTicket,
    CreateActivity,
    ReadActivities,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTicket => "create_ticket",
            Self::ReadTickets => "read_tickets",
            Self::UpdateTicket => "update_ticket",
            Self::DeleteTicket => "delete_ticket",
            Self::CreateActivity => "create_activity",
            Self::ReadActivities => "read_activities",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity behind a request once its token (if any) has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(UserProfile),
}

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }
}

/// Decide whether `operation` is permitted.
///
/// # Examples
/// ```
/// use ticketrax::domain::{Operation, permit};
///
/// assert!(permit(Operation::CreateTicket, false));
/// assert!(!permit(Operation::DeleteTicket, false));
/// assert!(permit(Operation::DeleteTicket, true));
/// ```
pub fn permit(operation: Operation, caller_is_authenticated: bool) -> bool {
    match operation {
        Operation::CreateTicket | Operation::ReadTickets | Operation::ReadActivities => true,
        Operation::UpdateTicket | Operation::DeleteTicket | Operation::CreateActivity => {
            caller_is_authenticated
        }
    }
}

/// Enforce [`permit`] for a resolved caller.
pub fn authorize(operation: Operation, caller: &Caller) -> Result<(), Error> {
    if permit(operation, caller.is_authenticated()) {
        Ok(())
    } else {
        Err(Error::forbidden(AUTHENTICATION_REQUIRED)
            .with_details(serde_json::json!({ "operation": operation.as_str() })))
    }
}
