//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`UserDirectory`], [`TokenStore`],
//! [`PasswordVerifier`]) describe what the domain needs from storage and
//! crypto adapters; each exposes a typed error built with
//! `define_port_error!`. Driving ports ([`LoginService`],
//! [`TokenAuthenticator`], the ticket and activity commands and queries) are
//! what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod activity_command;
mod activity_query;
mod activity_repository;
mod login_service;
mod password_verifier;
mod ticket_command;
mod ticket_query;
mod ticket_repository;
mod token_store;
mod user_directory;

pub use activity_command::ActivityCommand;
pub use activity_query::ActivityQuery;
#[cfg(test)]
pub use activity_repository::MockActivityRepository;
pub use activity_repository::{ActivityRepository, ActivityRepositoryError};
#[cfg(test)]
pub use login_service::{MockLoginService, MockTokenAuthenticator};
pub use login_service::{LoginService, TokenAuthenticator};
#[cfg(test)]
pub use password_verifier::MockPasswordVerifier;
pub use password_verifier::{PasswordVerifier, PasswordVerifierError};
pub use ticket_command::TicketCommand;
pub use ticket_query::TicketQuery;
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{TicketRepository, TicketRepositoryError};
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{TokenStore, TokenStoreError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
