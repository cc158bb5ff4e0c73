//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module, and every database failure is mapped onto the port's error enum.
//!
//! # Example
//!
//! ```no_run
//! use ticketrax::outbound::persistence::{DbPool, DieselTicketRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), ticketrax::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ticketrax")).await?;
//! let tickets = DieselTicketRepository::new(pool);
//! # let _ = tickets;
//! # Ok(())
//! # }
//! ```

mod diesel_activity_repository;
mod diesel_ticket_repository;
mod diesel_token_store;
mod diesel_user_directory;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_activity_repository::DieselActivityRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_token_store::DieselTokenStore;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
