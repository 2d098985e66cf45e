//! Authentication module for the survey intake service.
//!
//! Bearer tokens are minted from a fixed credential table and required
//! by the read endpoint:
//! - `jwt`: token signing and verification
//! - `credentials`: configured username/password pairs
//! - `gate`: the login and verification operations used by handlers
//! - `middleware`: axum layer guarding protected routes

mod credentials;
mod gate;
mod jwt;
mod middleware;

pub use credentials::*;
pub use gate::*;
pub use jwt::*;
pub use middleware::*;
