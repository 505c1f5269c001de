//! User repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{User, UserId, UserProfile};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations must be safe for concurrent use; the authentication
/// service issues at most one lookup per call and never holds a lock across
/// lookups.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an active user by exact email match (for login)
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by ID with the password hash excluded
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Check whether an active user already uses this email or person ID
    async fn identity_taken(&self, email: &str, person_id: &str) -> Result<bool, DomainError>;

    /// Persist a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;
}
