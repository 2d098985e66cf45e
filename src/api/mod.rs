//! HTTP API layer for the survey intake service.
//!
//! Provides the survey write endpoint, the authenticated read endpoint and
//! token issuance.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
