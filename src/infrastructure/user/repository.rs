//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserProfile, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let users = users.into_iter().map(|u| (*u.id(), u)).collect();

        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;

        Ok(users
            .values()
            .find(|u| u.is_active() && u.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id).map(User::profile))
    }

    async fn identity_taken(&self, email: &str, person_id: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;

        Ok(users
            .values()
            .any(|u| u.person_id() == person_id || (u.is_active() && u.email() == email)))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        let clash = users.values().any(|u| {
            u.person_id() == user.person_id()
                || (user.is_active() && u.is_active() && u.email() == user.email())
        });

        if clash {
            return Err(DomainError::conflict(
                "A user with this email or person ID already exists",
            ));
        }

        users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.users.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;

    fn create_test_user(person_id: &str, email: &str) -> User {
        User::new(
            UserId::generate(),
            person_id,
            email,
            "hashed_password",
            UserRole::Employee,
        )
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("EMP001", "jane@example.com");

        repo.create(user.clone()).await.unwrap();

        let profile = repo.find_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(profile.email, "jane@example.com");
        assert_eq!(profile.person_id, "EMP001");
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let repo = InMemoryUserRepository::new();

        let result = repo.find_by_id(&UserId::generate()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_active_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("EMP001", "jane@example.com");

        repo.create(user.clone()).await.unwrap();

        let found = repo
            .find_active_by_email("jane@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), user.id());
        assert_eq!(found.password_hash(), "hashed_password");

        let missing = repo.find_active_by_email("other@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_active_by_email_skips_inactive() {
        let inactive = create_test_user("EMP001", "jane@example.com").into_inactive();

        let repo = InMemoryUserRepository::with_users(vec![inactive.clone()]);

        let found = repo.find_active_by_email("jane@example.com").await.unwrap();
        assert!(found.is_none());

        // Inactive users still resolve by ID
        let profile = repo.find_by_id(inactive.id()).await.unwrap().unwrap();
        assert!(!profile.is_active);
    }

    #[tokio::test]
    async fn test_inactive_email_can_be_reused() {
        let old = create_test_user("EMP001", "jane@example.com").into_inactive();

        let repo = InMemoryUserRepository::with_users(vec![old]);
        let replacement = create_test_user("EMP002", "jane@example.com");

        repo.create(replacement.clone()).await.unwrap();

        let found = repo
            .find_active_by_email("jane@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), replacement.id());
    }

    #[tokio::test]
    async fn test_duplicate_active_email() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("EMP001", "jane@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_user("EMP002", "jane@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_person_id() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("EMP001", "jane@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_user("EMP001", "john@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_identity_taken() {
        let repo = InMemoryUserRepository::with_users(vec![create_test_user(
            "EMP001",
            "jane@example.com",
        )]);

        assert!(repo.identity_taken("jane@example.com", "EMP999").await.unwrap());
        assert!(repo.identity_taken("x@example.com", "EMP001").await.unwrap());
        assert!(!repo.identity_taken("x@example.com", "EMP999").await.unwrap());
    }

    #[tokio::test]
    async fn test_count() {
        let repo = InMemoryUserRepository::with_users(vec![
            create_test_user("EMP001", "a@example.com"),
            create_test_user("EMP002", "b@example.com"),
        ]);

        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
