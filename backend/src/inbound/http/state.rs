//! Shared HTTP adapter state.
//!
//! HTTP handlers and the access gate accept this state via
//! `actix_web::web::Data` so they only depend on driving ports and remain
//! testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ActivityCommand, ActivityQuery, ActivityRepository, LoginService, PasswordVerifier,
    TicketCommand, TicketQuery, TicketRepository, TokenAuthenticator, TokenStore, UserDirectory,
};
use crate::domain::{ActivityService, IdentityService, TicketService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn TokenAuthenticator>,
    pub tickets: Arc<dyn TicketCommand>,
    pub tickets_query: Arc<dyn TicketQuery>,
    pub activities: Arc<dyn ActivityCommand>,
    pub activities_query: Arc<dyn ActivityQuery>,
}

impl HttpState {
    /// Build the domain services over one set of driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
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
    /// # let _ = state;
    /// ```
    pub fn wire<T, A, U, K, P>(
        adapters: DrivenAdapters<T, A, U, K, P>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        T: TicketRepository + 'static,
        A: ActivityRepository + 'static,
        U: UserDirectory + 'static,
        K: TokenStore + 'static,
        P: PasswordVerifier + 'static,
    {
        let DrivenAdapters {
            tickets,
            activities,
            users,
            tokens,
            passwords,
        } = adapters;
        let identity = Arc::new(IdentityService::new(users.clone(), tokens, passwords));
        let ticket_service = Arc::new(TicketService::new(
            tickets.clone(),
            activities.clone(),
            users,
            clock.clone(),
        ));
        let activity_service = Arc::new(ActivityService::new(tickets, activities, clock));
        Self {
            login: identity.clone(),
            tokens: identity,
            tickets: ticket_service.clone(),
            tickets_query: ticket_service,
            activities: activity_service.clone(),
            activities_query: activity_service,
        }
    }
}

/// Driven adapters the services are built over.
pub struct DrivenAdapters<T, A, U, K, P> {
    pub tickets: Arc<T>,
    pub activities: Arc<A>,
    pub users: Arc<U>,
    pub tokens: Arc<K>,
    pub passwords: Arc<P>,
}
