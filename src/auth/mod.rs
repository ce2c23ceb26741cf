//! Authentication module for the access gate.
//!
//! - Gate: master-token and per-client access-token checks by path prefix
//! - Directory: client_id to access-token lookup
//! - Middleware: axum integration

mod directory;
mod gate;
mod middleware;
mod params;

pub use directory::*;
pub use gate::*;
pub use middleware::*;
pub use params::*;
