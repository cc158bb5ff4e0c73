//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    ActivityCommand, ActivityQuery, LoginService, TicketCommand, TicketQuery, TokenAuthenticator,
};
use crate::domain::{
    Activity, ActivityDraft, ActivityId, AuthSession, AuthToken, Error, LoginCredentials,
    TicketChanges, TicketDetails, TicketDraft, TicketFilter, TicketId, UserProfile,
};

use super::state::HttpState;

/// Driving-port stand-in for handlers that must never reach the domain.
struct Unreachable;

fn unreachable() -> Error {
    Error::service_unavailable("service not wired in this test")
}

#[async_trait]
impl LoginService for Unreachable {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        Err(unreachable())
    }
}

#[async_trait]
impl TokenAuthenticator for Unreachable {
    async fn resolve(&self, _token: &AuthToken) -> Result<UserProfile, Error> {
        Err(unreachable())
    }
}

#[async_trait]
impl TicketCommand for Unreachable {
    async fn create(&self, _draft: TicketDraft) -> Result<TicketDetails, Error> {
        Err(unreachable())
    }

    async fn update(
        &self,
        _id: &TicketId,
        _changes: TicketChanges,
    ) -> Result<TicketDetails, Error> {
        Err(unreachable())
    }

    async fn delete(&self, _id: &TicketId) -> Result<(), Error> {
        Err(unreachable())
    }
}

#[async_trait]
impl TicketQuery for Unreachable {
    async fn list(&self, _filter: &TicketFilter) -> Result<Vec<TicketDetails>, Error> {
        Err(unreachable())
    }

    async fn get(&self, _id: &TicketId) -> Result<TicketDetails, Error> {
        Err(unreachable())
    }

    async fn activities(&self, _id: &TicketId) -> Result<Vec<Activity>, Error> {
        Err(unreachable())
    }
}

#[async_trait]
impl ActivityCommand for Unreachable {
    async fn record(&self, _draft: ActivityDraft) -> Result<Activity, Error> {
        Err(unreachable())
    }
}

#[async_trait]
impl ActivityQuery for Unreachable {
    async fn list(&self) -> Result<Vec<Activity>, Error> {
        Err(unreachable())
    }

    async fn get(&self, _id: &ActivityId) -> Result<Activity, Error> {
        Err(unreachable())
    }
}

/// State whose every port fails with `service_unavailable`.
pub fn unreachable_state() -> HttpState {
    let port = Arc::new(Unreachable);
    HttpState {
        login: port.clone(),
        tokens: port.clone(),
        tickets: port.clone(),
        tickets_query: port.clone(),
        activities: port.clone(),
        activities_query: port,
    }
}

/// Unreachable state with a caller-supplied token authenticator.
pub fn stub_state(tokens: Arc<dyn TokenAuthenticator>) -> HttpState {
    HttpState {
        tokens,
        ..unreachable_state()
    }
}
