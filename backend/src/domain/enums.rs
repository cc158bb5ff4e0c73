//! Closed enumerations for ticket lifecycle and audit entries.
//!
//! Every enum parses from and renders to its snake_case wire form; anything
//! else is rejected at the boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    New,
    Open,
    Pending,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`TicketStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTicketStatusError {
    pub input: String,
}

impl fmt::Display for ParseTicketStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid ticket status: {}", self.input)
    }
}

impl std::error::Error for ParseTicketStatusError {}

impl FromStr for TicketStatus {
    type Err = ParseTicketStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new" => Ok(Self::New),
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseTicketStatusError {
                input: value.to_owned(),
            }),
        }
    }
}

/// Urgency of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`TicketPriority`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTicketPriorityError {
    pub input: String,
}

impl fmt::Display for ParseTicketPriorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid ticket priority: {}", self.input)
    }
}

impl std::error::Error for ParseTicketPriorityError {}

impl FromStr for TicketPriority {
    type Err = ParseTicketPriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTicketPriorityError {
                input: value.to_owned(),
            }),
        }
    }
}

/// Kind of audit entry recorded against a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    StatusChange,
    PriorityChange,
    Assignment,
    Comment,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusChange => "status_change",
            Self::PriorityChange => "priority_change",
            Self::Assignment => "assignment",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`ActivityType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActivityTypeError {
    pub input: String,
}

impl fmt::Display for ParseActivityTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid activity type: {}", self.input)
    }
}

impl std::error::Error for ParseActivityTypeError {}

impl FromStr for ActivityType {
    type Err = ParseActivityTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "status_change" => Ok(Self::StatusChange),
            "priority_change" => Ok(Self::PriorityChange),
            "assignment" => Ok(Self::Assignment),
            "comment" => Ok(Self::Comment),
            _ => Err(ParseActivityTypeError {
                input: value.to_owned(),
            }),
        }
    }
}
