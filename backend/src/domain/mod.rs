//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the ticket and activity model, the access policy, and the
//! services behind the driving ports. Nothing here depends on HTTP or
//! Diesel; adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - [`Ticket`], [`Activity`] and their validated inputs.
//! - [`TicketService`], [`ActivityService`], [`IdentityService`].
//! - [`permit`] / [`authorize`] implementing the access table.
//! - [`Error`] / [`ErrorCode`], the transport-agnostic failure type.

pub mod access_policy;
pub mod activity;
pub mod activity_service;
pub mod auth;
pub mod enums;
pub mod error;
pub mod identity_service;
pub mod ids;
pub mod ports;
pub mod ticket;
pub mod ticket_service;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::access_policy::{AUTHENTICATION_REQUIRED, Caller, Operation, authorize, permit};
pub use self::activity::{
    ACTOR_MAX, Activity, ActivityDraft, ActivityMessage, ActivityRecord, ActorLabel,
    SEED_ACTIVITY_MESSAGE,
};
pub use self::activity_service::ActivityService;
pub use self::auth::{AuthSession, AuthToken, LoginCredentials, LoginValidationError};
pub use self::enums::{
    ActivityType, ParseActivityTypeError, ParseTicketPriorityError, ParseTicketStatusError,
    TicketPriority, TicketStatus,
};
pub use self::error::{Error, ErrorCode};
pub use self::identity_service::{INVALID_CREDENTIALS, INVALID_TOKEN, IdentityService};
pub use self::ids::{ActivityId, ParseIdentifierError, TicketId, UserId};
pub use self::ticket::{
    CREATOR_NAME_MAX, CreatorName, TITLE_MAX, Ticket, TicketChanges, TicketDescription,
    TicketDetails, TicketDraft, TicketFilter, TicketRecord, TicketTitle, creator_email,
};
pub use self::ticket_service::TicketService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DirectoryUser, EMAIL_MAX, EmailAddress, EmailValidationError, UserProfile,
};
pub use self::validation::{FieldError, FieldProblem};
