//! Authentication infrastructure module
//!
//! JWT token signing/verification and the login / verify service built on it.

mod jwt;
mod service;

pub use jwt::{JwtConfig, JwtService};
pub use service::AuthService;
