//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserId, UserProfile, UserRepository, UserRole};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, person_id, email, password_hash, role, is_active,
                   created_at, updated_at
            FROM users
            WHERE email = $1 AND is_active
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, person_id, email, role, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn identity_taken(&self, email: &str, person_id: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE person_id = $2 OR (email = $1 AND is_active)
            )
            "#,
        )
        .bind(email)
        .bind(person_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check user identity: {}", e)))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, person_id, email, password_hash, role, is_active,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.person_id())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.is_active())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::conflict(
                "A user with this email or person ID already exists",
            ),
            _ => DomainError::storage(format!("Failed to create user: {}", e)),
        })?;

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn parse_role(row: &PgRow) -> Result<UserRole, DomainError> {
    let role: String = row.try_get("role").map_err(column_error)?;

    role.parse()
        .map_err(|e| DomainError::storage(format!("Invalid role in database: {}", e)))
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to decode user row: {}", e))
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: Uuid = row.try_get("id").map_err(column_error)?;

    Ok(User::from_parts(
        UserId::from(id),
        row.try_get("person_id").map_err(column_error)?,
        row.try_get("email").map_err(column_error)?,
        row.try_get("password_hash").map_err(column_error)?,
        parse_role(row)?,
        row.try_get("is_active").map_err(column_error)?,
        row.try_get("created_at").map_err(column_error)?,
        row.try_get("updated_at").map_err(column_error)?,
    ))
}

fn row_to_profile(row: &PgRow) -> Result<UserProfile, DomainError> {
    let id: Uuid = row.try_get("id").map_err(column_error)?;

    Ok(UserProfile {
        id: UserId::from(id),
        person_id: row.try_get("person_id").map_err(column_error)?,
        email: row.try_get("email").map_err(column_error)?,
        role: parse_role(row)?,
        is_active: row.try_get("is_active").map_err(column_error)?,
        created_at: row.try_get("created_at").map_err(column_error)?,
        updated_at: row.try_get("updated_at").map_err(column_error)?,
    })
}
