//! Token authentication endpoint.
//!
//! ```text
//! POST /api/v1/auth {"email":"ada@example.com","password":"secret"}
//! ```

use actix_web::web;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AuthSession, Error, LoginCredentials, LoginValidationError, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Message returned when either credential is missing or blank.
pub const CREDENTIALS_REQUIRED: &str = "Email and password required.";

/// Login request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AuthRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "correct horse battery staple")]
    pub password: Option<String>,
}

impl TryFrom<AuthRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: AuthRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
    }
}

/// Public profile of an authenticated user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            id: *user.id.as_uuid(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Issued token together with the user it belongs to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token.as_str().to_owned(),
            user: session.user.into(),
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(CREDENTIALS_REQUIRED)
        .with_details(json!({ "field": field, "code": "empty" }))
}

/// Exchange email and password for a bearer token.
///
/// Repeated logins return the same token.
#[utoipa::path(
    post,
    path = "/api/v1/auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Missing or invalid credentials", body = ErrorSchema),
        (status = 401, description = "Malformed or unknown token header", body = ErrorSchema),
        (status = 503, description = "User directory unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "authenticate",
    security([])
)]
pub async fn authenticate(
    state: web::Data<HttpState>,
    payload: web::Json<AuthRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.login.authenticate(&credentials).await?;
    Ok(web::Json(session.into()))
}
