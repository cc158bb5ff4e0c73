//! Server construction and adapter wiring.

mod config;
mod state_builders;

pub use config::ServerSettings;

use state_builders::build_http_state;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};

#[cfg(debug_assertions)]
use ticketrax::doc::ApiDoc;
use ticketrax::inbound::http::health::HealthState;
use ticketrax::inbound::http::routes::build_app;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Construct an Actix HTTP server using the provided health state and settings.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `settings`: bind address, database and seed configuration.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when building the adapters, binding the
/// socket, or starting the server fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    settings: ServerSettings,
) -> std::io::Result<Server> {
    let bind_addr = settings.bind_addr()?;
    let http_state = web::Data::new(build_http_state(&settings).await?);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = build_app(http_state.clone(), server_health_state.clone());

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
