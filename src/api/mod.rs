//! HTTP API layer for the access gate.
//!
//! Provides the application routes that sit behind the gate.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
