//! Domain layer - Core authentication types and collaborator traits

pub mod auth;
pub mod error;
pub mod user;

pub use auth::{AuthError, Credentials, IssuedToken, LoginSuccess, TokenClaims, TokenCodec, TokenRejection};
pub use error::DomainError;
pub use user::{User, UserId, UserProfile, UserRepository, UserRole, UserSummary};
