//! Activity log API handlers.
//!
//! ```text
//! GET  /api/v1/activities
//! POST /api/v1/activities {"ticket":"…","type":"comment","message":"…","created_by":"…"}
//! GET  /api/v1/activities/{id}
//! ```
//!
//! Activities are append-only: there is no update or delete route.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Activity, ActivityDraft, ActivityId, ActivityMessage, ActivityType, ActorLabel, Error,
    FieldError, TicketId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_field, parse_path_id, require};

pub(crate) const ACTIVITY_NOT_FOUND: &str = "Activity not found.";

/// Audit entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    pub id: Uuid,
    /// Owning ticket.
    pub ticket: Uuid,
    #[serde(rename = "type")]
    #[schema(example = "comment")]
    pub kind: String,
    pub message: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Activity> for ActivityResponse {
    fn from(activity: &Activity) -> Self {
        Self {
            id: *activity.id().as_uuid(),
            ticket: *activity.ticket_id().as_uuid(),
            kind: activity.kind().as_str().to_owned(),
            message: activity.message().to_owned(),
            created_by: activity.created_by().to_owned(),
            created_at: activity.created_at(),
        }
    }
}

/// Request body for recording an activity.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ActivityRequest {
    /// Identifier of an existing ticket.
    pub ticket: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "status_change")]
    pub kind: Option<String>,
    pub message: Option<String>,
    #[schema(example = "Support desk")]
    pub created_by: Option<String>,
}

impl TryFrom<ActivityRequest> for ActivityDraft {
    type Error = FieldError;

    fn try_from(value: ActivityRequest) -> Result<Self, Self::Error> {
        let ticket_id: TicketId =
            parse_field("ticket", require("ticket", value.ticket.as_deref())?)?;
        let kind: ActivityType = parse_field("type", require("type", value.kind.as_deref())?)?;
        let message = ActivityMessage::new(require("message", value.message.as_deref())?)?;
        let created_by = ActorLabel::new(require("created_by", value.created_by.as_deref())?)?;
        Ok(Self {
            ticket_id,
            kind,
            message,
            created_by,
        })
    }
}

/// List every activity, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/activities",
    responses(
        (
            status = 200,
            description = "Activities in ascending creation order",
            body = [ActivityResponse]
        ),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "listActivities",
    security((), ("token" = []))
)]
pub async fn list_activities(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ActivityResponse>>> {
    let activities = state.activities_query.list().await?;
    Ok(web::Json(activities.iter().map(ActivityResponse::from).collect()))
}

/// Record an activity against an existing ticket.
#[utoipa::path(
    post,
    path = "/api/v1/activities",
    request_body = ActivityRequest,
    responses(
        (status = 201, description = "Activity recorded", body = ActivityResponse),
        (status = 400, description = "Invalid payload or unknown ticket", body = ErrorSchema),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 403, description = "Authentication required", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "createActivity",
    security(("token" = []))
)]
pub async fn create_activity(
    state: web::Data<HttpState>,
    payload: web::Json<ActivityRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ActivityDraft::try_from(payload.into_inner())?;
    let activity = state.activities.record(draft).await?;
    Ok(HttpResponse::Created().json(ActivityResponse::from(&activity)))
}

/// Fetch a single activity.
#[utoipa::path(
    get,
    path = "/api/v1/activities/{id}",
    params(("id" = Uuid, Path, description = "Activity identifier")),
    responses(
        (status = 200, description = "Activity", body = ActivityResponse),
        (status = 401, description = "Malformed or unknown token", body = ErrorSchema),
        (status = 404, description = "Unknown activity", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "getActivity",
    security((), ("token" = []))
)]
pub async fn get_activity(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ActivityResponse>> {
    let id: ActivityId = parse_path_id(&path, ACTIVITY_NOT_FOUND)?;
    let activity = state.activities_query.get(&id).await?;
    Ok(web::Json(ActivityResponse::from(&activity)))
}
