//! Ticket API handlers.
//!
//! ```text
//! GET    /api/v1/tickets?status=open&priority=high&search=printer
//! POST   /api/v1/tickets
//! GET    /api/v1/tickets/{id}
//! PUT    /api/v1/tickets/{id}
//! PATCH  /api/v1/tickets/{id}
//! DELETE /api/v1/tickets/{id}
//! GET    /api/v1/tickets/{id}/activities
//! ```
//!
//! Every ticket representation nests its activities in chronological order.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::validation::reject_null_characters;
use crate::domain::{
    CreatorName, Error, FieldError, TicketChanges, TicketDescription, TicketDetails, TicketDraft,
    TicketFilter, TicketId, TicketPriority, TicketStatus, TicketTitle, UserId, creator_email,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::activities::ActivityResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    non_null, parse_field, parse_path_id, parse_query_param, require,
};

pub(crate) const TICKET_NOT_FOUND: &str = "Ticket not found.";

/// Distinguish an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Ticket write payload shared by create, replace and partial update.
///
/// Enumerations and references are carried as text so unknown values are
/// reported per field. Every field separates an explicit `null` from an
/// omitted one; only `assigned_to` accepts `null`.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct TicketRequest {
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "Printer broken")]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "The second floor printer jams on every job.")]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "new")]
    pub status: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "medium")]
    pub priority: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "Kim Lee")]
    pub created_by_name: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "kim@example.com")]
    pub created_by_email: Option<Option<String>>,
    /// Assigned user id. `null` clears the assignment; omit to keep it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub assigned_to: Option<Option<String>>,
}

fn parse_assignee(raw: Option<&str>) -> Result<Option<UserId>, FieldError> {
    raw.map(|value| parse_field("assigned_to", value)).transpose()
}

impl TryFrom<TicketRequest> for TicketDraft {
    type Error = FieldError;

    fn try_from(value: TicketRequest) -> Result<Self, Self::Error> {
        let title = TicketTitle::new(require("title", non_null("title", &value.title)?)?)?;
        let description = TicketDescription::new(require(
            "description",
            non_null("description", &value.description)?,
        )?)?;
        let status = non_null("status", &value.status)?
            .map(|raw| parse_field::<TicketStatus>("status", raw))
            .transpose()?
            .unwrap_or_default();
        let priority = non_null("priority", &value.priority)?
            .map(|raw| parse_field::<TicketPriority>("priority", raw))
            .transpose()?
            .unwrap_or_default();
        let created_by_name = CreatorName::new(require(
            "created_by_name",
            non_null("created_by_name", &value.created_by_name)?,
        )?)?;
        let created_by_email = creator_email(require(
            "created_by_email",
            non_null("created_by_email", &value.created_by_email)?,
        )?)?;
        let assigned_to = parse_assignee(value.assigned_to.flatten().as_deref())?;
        Ok(Self {
            title,
            description,
            status,
            priority,
            created_by_name,
            created_by_email,
            assigned_to,
        })
    }
}

impl TryFrom<TicketRequest> for TicketChanges {
    type Error = FieldError;

    fn try_from(value: TicketRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: non_null("title", &value.title)?
                .map(TicketTitle::new)
                .transpose()?,
            description: non_null("description", &value.description)?
                .map(TicketDescription::new)
                .transpose()?,
            status: non_null("status", &value.status)?
                .map(|raw| parse_field("status", raw))
                .transpose()?,
            priority: non_null("priority", &value.priority)?
                .map(|raw| parse_field("priority", raw))
                .transpose()?,
            created_by_name: non_null("created_by_name", &value.created_by_name)?
                .map(CreatorName::new)
                .transpose()?,
            created_by_email: non_null("created_by_email", &value.created_by_email)?
                .map(creator_email)
                .transpose()?,
            assigned_to: value
                .assigned_to
                .map(|assignee| parse_assignee(assignee.as_deref()))
                .transpose()?,
        })
    }
}

/// Ticket as returned by the API, with its audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[schema(example = "new")]
    pub status: String,
    #[schema(example = "medium")]
    pub priority: String,
    pub created_by_name: String,
    pub created_by_email: String,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Activities in ascending creation order.
    pub activities: Vec<ActivityResponse>,
}

impl From<&TicketDetails> for TicketResponse {
    fn from(details: &TicketDetails) -> Self {
        let ticket = &details.ticket;
        Self {
            id: *ticket.id().as_uuid(),
            title: ticket.title().to_owned(),
            description: ticket.description().to_owned(),
            status: ticket.status().as_str().to_owned(),
            priority: ticket.priority().as_str().to_owned(),
            created_by_name: ticket.created_by_name().to_owned(),
            created_by_email: ticket.created_by_email().to_owned(),
            assigned_to: ticket.assigned_to().map(|user| *user.as_uuid()),
            created_at: ticket.created_at(),
            updated_at: ticket.updated_at(),
            activities: details
                .activities
                .iter()
                .map(ActivityResponse::from)
                .collect(),
        }
    }
}

/// Optional list filters, combined with AND.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TicketListQuery {
    /// Only tickets with this status.
    pub status: Option<String>,
    /// Only tickets with this priority.
    pub priority: Option<String>,
    /// Case-insensitive substring of title, description or creator name.
    pub search: Option<String>,
}

impl TryFrom<&TicketListQuery> for TicketFilter {
    type Error = Error;

    fn try_from(query: &TicketListQuery) -> Result<Self, Self::Error> {
        if let Some(term) = query.search.as_deref() {
            reject_null_characters("search", term)?;
        }
        Ok(TicketFilter::new(
            parse_query_param("status", query.status.as_deref())?,
            parse_query_param("priority", query.priority.as_deref())?,
            query.search.as_deref(),
        ))
    }
}

fn ticket_id(raw: &str) -> Result<TicketId, Error> {
    parse_path_id(raw, TICKET_NOT_FOUND)
}

/// List tickets, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    params(TicketListQuery),
    responses(
        (
            status = 200,
            description = "Tickets in descending creation order",
            body = [TicketResponse]
        ),
        (status = 400, description = "Unknown filter value", body = ErrorSchema),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listTickets",
    security((), ("token" = []))
)]
pub async fn list_tickets(
    state: web::Data<HttpState>,
    query: web::Query<TicketListQuery>,
) -> ApiResult<web::Json<Vec<TicketResponse>>> {
    let filter = TicketFilter::try_from(&query.into_inner())?;
    let tickets = state.tickets_query.list(&filter).await?;
    Ok(web::Json(tickets.iter().map(TicketResponse::from).collect()))
}

/// Open a ticket. Anyone may create one.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = TicketRequest,
    responses(
        (
            status = 201,
            description = "Ticket created with its seed activity",
            body = TicketResponse
        ),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "createTicket",
    security((), ("token" = []))
)]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    payload: web::Json<TicketRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TicketDraft::try_from(payload.into_inner())?;
    let details = state.tickets.create(draft).await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(&details)))
}

/// Fetch one ticket.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket", body = TicketResponse),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 404, description = "Unknown ticket", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "getTicket",
    security((), ("token" = []))
)]
pub async fn get_ticket(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TicketResponse>> {
    let id = ticket_id(&path)?;
    let details = state.tickets_query.get(&id).await?;
    Ok(web::Json(TicketResponse::from(&details)))
}

/// Replace a ticket's writable fields.
///
/// Title, description and both creator fields are required; omitted optional
/// fields keep their current value.
#[utoipa::path(
    put,
    path = "/api/v1/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket identifier")),
    request_body = TicketRequest,
    responses(
        (status = 200, description = "Updated ticket", body = TicketResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 403, description = "Authentication required", body = ErrorSchema),
        (status = 404, description = "Unknown ticket", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "replaceTicket",
    security(("token" = []))
)]
pub async fn replace_ticket(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TicketRequest>,
) -> ApiResult<web::Json<TicketResponse>> {
    let id = ticket_id(&path)?;
    let changes = TicketChanges::try_from(payload.into_inner())?;
    changes.require_complete()?;
    let details = state.tickets.update(&id, changes).await?;
    Ok(web::Json(TicketResponse::from(&details)))
}

/// Apply a partial update.
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket identifier")),
    request_body = TicketRequest,
    responses(
        (status = 200, description = "Updated ticket", body = TicketResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 403, description = "Authentication required", body = ErrorSchema),
        (status = 404, description = "Unknown ticket", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "updateTicket",
    security(("token" = []))
)]
pub async fn update_ticket(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TicketRequest>,
) -> ApiResult<web::Json<TicketResponse>> {
    let id = ticket_id(&path)?;
    let changes = TicketChanges::try_from(payload.into_inner())?;
    let details = state.tickets.update(&id, changes).await?;
    Ok(web::Json(TicketResponse::from(&details)))
}

/// Delete a ticket and its activities.
#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket identifier")),
    responses(
        (status = 204, description = "Ticket deleted"),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 403, description = "Authentication required", body = ErrorSchema),
        (status = 404, description = "Unknown ticket", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "deleteTicket",
    security(("token" = []))
)]
pub async fn delete_ticket(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = ticket_id(&path)?;
    state.tickets.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Audit trail of one ticket, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}/activities",
    params(("id" = Uuid, Path, description = "Ticket identifier")),
    responses(
        (
            status = 200,
            description = "Activities in ascending creation order",
            body = [ActivityResponse]
        ),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 404, description = "Unknown ticket", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listTicketActivities",
    security((), ("token" = []))
)]
pub async fn ticket_activities(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ActivityResponse>>> {
    let id = ticket_id(&path)?;
    let activities = state.tickets_query.activities(&id).await?;
    Ok(web::Json(activities.iter().map(ActivityResponse::from).collect()))
}

#[cfg(test)]
#[path = "tickets_tests.rs"]
mod tests;
