//! Outbound adapters implementing the domain's driven ports.
//!
//! - [`memory`] keeps everything in process and backs tests and database-less
//!   runs.
//! - [`persistence`] stores users, tokens, tickets, and activities in
//!   PostgreSQL through Diesel.
//! - [`password`] verifies argon2 password hashes.

pub mod memory;
pub mod password;
pub mod persistence;
