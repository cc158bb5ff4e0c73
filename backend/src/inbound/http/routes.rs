//! Explicit routing table for the REST API.
//!
//! ```text
//! POST   /api/v1/auth
//! GET    /api/v1/tickets                  read tickets
//! POST   /api/v1/tickets                  create ticket
//! GET    /api/v1/tickets/{id}             read tickets
//! PUT    /api/v1/tickets/{id}             update ticket
//! PATCH  /api/v1/tickets/{id}             update ticket
//! DELETE /api/v1/tickets/{id}             delete ticket
//! GET    /api/v1/tickets/{id}/activities  read activities
//! GET    /api/v1/activities               read activities
//! POST   /api/v1/activities               create activity
//! GET    /api/v1/activities/{id}          read activities
//! GET    /health/ready, /health/live
//! ```
//!
//! Each resource is wrapped in an [`AccessGate`] naming the operation every
//! method performs, so the access policy runs before any handler. Methods
//! not listed answer `405 Method Not Allowed`.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::middleware::NormalizePath;
use actix_web::{App, web};

use crate::Trace;
use crate::domain::Operation;
use crate::inbound::http::access_gate::AccessGate;
use crate::inbound::http::activities::{create_activity, get_activity, list_activities};
use crate::inbound::http::auth::authenticate;
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tickets::{
    create_ticket, delete_ticket, get_ticket, list_tickets, replace_ticket, ticket_activities,
    update_ticket,
};

/// Prefix shared by every API resource.
pub const API_PREFIX: &str = "/api/v1";

/// Register the `/api/v1` scope together with JSON and query error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope(API_PREFIX)
                .service(
                    web::resource("/auth")
                        .wrap(AccessGate::new())
                        .route(web::post().to(authenticate)),
                )
                .service(
                    web::resource("/tickets")
                        .wrap(
                            AccessGate::new()
                                .allow(Method::GET, Operation::ReadTickets)
                                .allow(Method::POST, Operation::CreateTicket),
                        )
                        .route(web::get().to(list_tickets))
                        .route(web::post().to(create_ticket)),
                )
                .service(
                    web::resource("/tickets/{id}")
                        .wrap(
                            AccessGate::new()
                                .allow(Method::GET, Operation::ReadTickets)
                                .allow(Method::PUT, Operation::UpdateTicket)
                                .allow(Method::PATCH, Operation::UpdateTicket)
                                .allow(Method::DELETE, Operation::DeleteTicket),
                        )
                        .route(web::get().to(get_ticket))
                        .route(web::put().to(replace_ticket))
                        .route(web::patch().to(update_ticket))
                        .route(web::delete().to(delete_ticket)),
                )
                .service(
                    web::resource("/tickets/{id}/activities")
                        .wrap(AccessGate::new().allow(Method::GET, Operation::ReadActivities))
                        .route(web::get().to(ticket_activities)),
                )
                .service(
                    web::resource("/activities")
                        .wrap(
                            AccessGate::new()
                                .allow(Method::GET, Operation::ReadActivities)
                                .allow(Method::POST, Operation::CreateActivity),
                        )
                        .route(web::get().to(list_activities))
                        .route(web::post().to(create_activity)),
                )
                .service(
                    web::resource("/activities/{id}")
                        .wrap(AccessGate::new().allow(Method::GET, Operation::ReadActivities))
                        .route(web::get().to(get_activity)),
                ),
        );
}

/// Assemble the application: state, tracing, trailing-slash normalisation,
/// health checks and the API scope.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::web;
/// use mockable::DefaultClock;
/// use ticketrax::inbound::http::health::HealthState;
/// use ticketrax::inbound::http::routes::build_app;
/// use ticketrax::inbound::http::state::{DrivenAdapters, HttpState};
/// use ticketrax::outbound::memory::InMemoryStore;
/// use ticketrax::outbound::password::Argon2PasswordVerifier;
///
/// let store = Arc::new(InMemoryStore::new());
/// let state = HttpState::wire(
///     DrivenAdapters {
///         tickets: store.clone(),
///         activities: store.clone(),
///         users: store.clone(),
///         tokens: store,
///         passwords: Arc::new(Argon2PasswordVerifier),
///     },
///     Arc::new(DefaultClock),
/// );
/// let app = build_app(web::Data::new(state), web::Data::new(HealthState::new()));
/// # let _ = app;
/// ```
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(NormalizePath::trim())
        .wrap(Trace)
        .configure(health::configure)
        .configure(configure)
}
