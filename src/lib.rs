//! Workforce authentication service
//!
//! Email/password login that issues a signed bearer token valid for 24 hours,
//! and verification of presented tokens back to the user they were issued for.
//! Users live in memory or in PostgreSQL.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::BootstrapConfig;
use domain::user::{UserRepository, UserRole};
use infrastructure::{
    auth::{AuthService, JwtConfig, JwtService},
    storage::{connect_postgres, run_user_migrations, PostgresConfig, StorageType},
    user::{
        Argon2Hasher, CreateUserRequest, InMemoryUserRepository, PasswordHasher,
        PostgresUserRepository, UserService,
    },
};
use rand::Rng;
use tracing::{info, warn};

const GENERATED_PASSWORD_LEN: usize = 16;

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::new(config.auth.jwt_secret()?, config.auth.token_ttl_hours)?;
    let codec = Arc::new(JwtService::new(jwt_config));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());

    let repository = create_user_repository(config).await?;

    let user_service = UserService::new(repository.clone(), hasher.clone());
    create_initial_admin_user(&user_service, &config.bootstrap).await?;

    let auth_service = Arc::new(AuthService::new(repository.clone(), hasher, codec));

    info!(
        token_ttl_hours = config.auth.token_ttl_hours,
        "Authentication service initialized"
    );

    Ok(AppState::new(auth_service, repository))
}

async fn create_user_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn UserRepository>> {
    match config.storage.storage_type()? {
        StorageType::InMemory => {
            warn!("Using in-memory user store; users are lost on restart");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
        StorageType::Postgres => {
            let pg_config = PostgresConfig::new(config.storage.database_url()?)
                .with_max_connections(config.storage.max_connections);
            let pool = connect_postgres(&pg_config).await?;

            run_user_migrations(&pool).await?;
            info!("Connected to PostgreSQL user store");

            Ok(Arc::new(PostgresUserRepository::new(pool)))
        }
    }
}

/// Create an admin account when the store is empty and an admin email is
/// configured. A generated password is logged once.
async fn create_initial_admin_user(
    user_service: &UserService,
    bootstrap: &BootstrapConfig,
) -> anyhow::Result<()> {
    let Some(email) = bootstrap.admin_email.as_deref() else {
        return Ok(());
    };

    if user_service.count().await? > 0 {
        return Ok(());
    }

    let (password, is_configured) = match bootstrap.admin_password.as_deref() {
        Some(p) if !p.is_empty() => (p.to_string(), true),
        _ => (generate_random_password(), false),
    };

    let user = user_service
        .create(CreateUserRequest {
            person_id: bootstrap.admin_person_id.clone(),
            email: email.to_string(),
            password: password.clone(),
            role: UserRole::Admin,
        })
        .await?;

    info!("===========================================");
    info!("Initial admin user created!");
    info!("Email: {}", user.email());
    info!("User ID: {}", user.id());

    if is_configured {
        info!("Password: (set via bootstrap.admin_password)");
    } else {
        info!("Password: {}", password);
    }

    info!("===========================================");

    Ok(())
}

fn generate_random_password() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}
