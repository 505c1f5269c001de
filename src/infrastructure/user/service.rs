//! User service for provisioning accounts

use std::sync::Arc;

use crate::domain::user::{
    validate_email, validate_password, validate_person_id, User, UserId, UserRepository, UserRole,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Clone)]
pub struct CreateUserRequest {
    pub person_id: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("person_id", &self.person_id)
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .field("role", &self.role)
            .finish()
    }
}

/// Creates users with hashed passwords
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Create a new user service
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new active user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_person_id(&request.person_id)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self
            .repository
            .identity_taken(&request.email, &request.person_id)
            .await?
        {
            return Err(DomainError::conflict(
                "A user with this email or person ID already exists",
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = User::new(
            UserId::generate(),
            request.person_id,
            request.email,
            password_hash,
            request.role,
        );

        self.repository.create(user).await
    }

    /// Count all users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
