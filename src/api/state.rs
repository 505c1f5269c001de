//! Application state shared by all handlers

use std::sync::Arc;

use crate::domain::user::UserRepository;
use crate::infrastructure::auth::AuthService;

/// Shared services, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    /// Used by the readiness probe
    pub user_repository: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, user_repository: Arc<dyn UserRepository>) -> Self {
        Self {
            auth_service,
            user_repository,
        }
    }
}
