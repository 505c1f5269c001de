//! Authentication domain
//!
//! Outcome types for login and token verification, plus the token codec
//! seam that the infrastructure layer implements with JWT.

mod outcome;
mod token;

pub use outcome::{AuthError, Credentials, LoginSuccess, TokenRejection};
pub use token::{IssuedToken, TokenClaims, TokenCodec};

#[cfg(test)]
pub use token::MockTokenCodec;
