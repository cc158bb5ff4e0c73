//! HTTP inbound adapter exposing REST endpoints.

pub mod access_gate;
pub mod activities;
pub mod auth;
pub mod caller;
pub mod error;
pub mod health;
pub mod routes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
mod validation;

pub use error::ApiResult;
