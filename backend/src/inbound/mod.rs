//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers, the routing table and the access gate live under [`http`].

pub mod http;
