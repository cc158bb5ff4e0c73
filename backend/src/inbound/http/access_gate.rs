//! Access gate middleware consulted before every API handler.
//!
//! Each resource in the routing table is wrapped in an [`AccessGate`] that
//! knows which [`Operation`] each HTTP method performs. For every request the
//! gate:
//!
//! 1. resolves a `Token` or `Bearer` `Authorization` header into a
//!    [`Caller`]; an unusable token fails with `401` even on routes open to
//!    anonymous callers, while other schemes leave the caller anonymous;
//! 2. asks the access policy whether the caller may perform the operation,
//!    failing with `403` otherwise;
//! 3. stores the [`Caller`] in the request extensions for handlers.
//!
//! Methods with no mapped operation pass straight through so the resource can
//! answer `405 Method Not Allowed`.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{Method, header};
use actix_web::{HttpMessage, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Caller, Error, Operation, authorize};

use super::caller::parse_authorization;
use super::state::HttpState;

/// Per-resource gate mapping HTTP methods to guarded operations.
///
/// # Examples
/// ```
/// use actix_web::http::Method;
/// use ticketrax::domain::Operation;
/// use ticketrax::inbound::http::access_gate::AccessGate;
///
/// let gate = AccessGate::new()
///     .allow(Method::GET, Operation::ReadTickets)
///     .allow(Method::POST, Operation::CreateTicket);
/// assert_eq!(gate.operation_for(&Method::POST), Some(Operation::CreateTicket));
/// assert_eq!(gate.operation_for(&Method::DELETE), None);
/// ```
#[derive(Clone, Default)]
pub struct AccessGate {
    rules: Rc<Vec<(Method, Operation)>>,
}

impl AccessGate {
    /// Gate that only resolves tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `method` to `operation`.
    pub fn allow(self, method: Method, operation: Operation) -> Self {
        let mut rules = Rc::unwrap_or_clone(self.rules);
        rules.push((method, operation));
        Self {
            rules: Rc::new(rules),
        }
    }

    pub fn operation_for(&self, method: &Method) -> Option<Operation> {
        self.rules
            .iter()
            .find(|(mapped, _)| mapped == method)
            .map(|(_, operation)| *operation)
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AccessGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware {
            service: Rc::new(service),
            gate: self.clone(),
        }))
    }
}

/// Service wrapper produced by [`AccessGate`].
pub struct AccessGateMiddleware<S> {
    service: Rc<S>,
    gate: AccessGate,
}

async fn resolve_caller(
    header: Option<header::HeaderValue>,
    state: Option<web::Data<HttpState>>,
) -> Result<Caller, Error> {
    let Some(header) = header else {
        return Ok(Caller::Anonymous);
    };
    let Some(token) = parse_authorization(&header)? else {
        return Ok(Caller::Anonymous);
    };
    let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let user = state.tokens.resolve(&token).await?;
    Ok(Caller::Authenticated(user))
}

async fn admit(
    operation: Option<Operation>,
    header: Option<header::HeaderValue>,
    state: Option<web::Data<HttpState>>,
) -> Result<Caller, Error> {
    let caller = resolve_caller(header, state).await?;
    if let Some(operation) = operation {
        authorize(operation, &caller).inspect_err(|_| {
            debug!(%operation, "access policy denied anonymous caller");
        })?;
    }
    Ok(caller)
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let operation = self.gate.operation_for(req.method());
        let header = req.headers().get(header::AUTHORIZATION).cloned();
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match admit(operation, header, state).await {
                Ok(caller) => {
                    req.extensions_mut().insert(caller);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(error) => Ok(req.error_response(error).map_into_right_body()),
            }
        })
    }
}
