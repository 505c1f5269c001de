//! Credential and bearer-token verification

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::auth::{AuthError, Credentials, LoginSuccess, TokenCodec, TokenRejection};
use crate::domain::user::{UserProfile, UserRepository};
use crate::infrastructure::observability::record_auth_attempt;
use crate::infrastructure::user::PasswordHasher;

/// Authentication service: checks credentials, issues tokens and resolves
/// presented tokens back to users.
///
/// Holds only shared read-only collaborators, so one instance serves any
/// number of concurrent requests.
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<dyn TokenCodec>,
    /// Hash checked when no account matches, so unknown emails cost the
    /// same as wrong passwords
    placeholder_hash: String,
}

const PLACEHOLDER_PASSWORD: &str = "placeholder-password-never-issued";

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<dyn TokenCodec>,
    ) -> Self {
        let placeholder_hash = hasher.hash(PLACEHOLDER_PASSWORD).unwrap_or_else(|e| {
            warn!(error = %e, "Could not prepare placeholder hash");
            String::new()
        });

        Self {
            repository,
            hasher,
            codec,
            placeholder_hash,
        }
    }

    /// Verify an email/password pair and issue a signed token
    pub async fn login(&self, credentials: Credentials<'_>) -> Result<LoginSuccess, AuthError> {
        let result = self.try_login(credentials).await;
        record_auth_attempt("login", outcome_label(&result));
        result
    }

    /// Resolve a bearer token to the user it was issued for
    pub async fn verify(&self, token: Option<&str>) -> Result<UserProfile, AuthError> {
        let result = self.try_verify(token).await;
        record_auth_attempt("verify", outcome_label(&result));
        result
    }

    async fn try_login(&self, credentials: Credentials<'_>) -> Result<LoginSuccess, AuthError> {
        if !credentials.is_complete() {
            debug!("Login rejected: missing email or password");
            return Err(AuthError::MissingFields);
        }

        let user = self
            .repository
            .find_active_by_email(credentials.email)
            .await
            .map_err(|e| {
                error!(error = %e, "User lookup failed during login");
                AuthError::Internal
            })?;

        // Unknown email and wrong password must look identical to the caller,
        // in outcome and in hashing cost
        let Some(user) = user else {
            self.hasher.verify(credentials.password, &self.placeholder_hash);
            warn!("Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(credentials.password, user.password_hash()) {
            warn!("Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.codec.sign(user.id(), user.role()).map_err(|e| {
            error!(error = %e, user_id = %user.id(), "Token signing failed");
            AuthError::Internal
        })?;

        info!(user_id = %user.id(), role = %user.role(), "Login successful");

        Ok(LoginSuccess {
            token: issued.token,
            expires_at: issued.expires_at,
            user: user.summary(),
        })
    }

    async fn try_verify(&self, token: Option<&str>) -> Result<UserProfile, AuthError> {
        let token = match token.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::InvalidToken(TokenRejection::Missing)),
        };

        let claims = self.codec.verify(token).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AuthError::InvalidToken(TokenRejection::Invalid)
        })?;

        let user_id = claims.subject().map_err(|e| {
            debug!(error = %e, "Token subject is not a user ID");
            AuthError::InvalidToken(TokenRejection::Invalid)
        })?;

        let profile = self.repository.find_by_id(&user_id).await.map_err(|e| {
            error!(error = %e, user_id = %user_id, "User lookup failed during token verification");
            AuthError::Internal
        })?;

        profile.ok_or_else(|| {
            debug!(user_id = %user_id, "Token subject no longer exists");
            AuthError::InvalidToken(TokenRejection::Invalid)
        })
    }
}

fn outcome_label<T>(result: &Result<T, AuthError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.outcome(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::MockTokenCodec;
    use crate::domain::user::{MockUserRepository, User, UserId, UserRole};
    use crate::domain::DomainError;
    use crate::infrastructure::auth::{JwtConfig, JwtService};
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, MockPasswordHasher};

    const PASSWORD: &str = "correct-horse";

    fn hasher() -> Arc<Argon2Hasher> {
        Arc::new(Argon2Hasher::new())
    }

    fn jwt(secret: &str) -> Arc<JwtService> {
        Arc::new(JwtService::new(JwtConfig::new(secret, 24).unwrap()))
    }

    fn create_user(email: &str, role: UserRole) -> User {
        let hash = Argon2Hasher::new().hash(PASSWORD).unwrap();
        User::new(UserId::generate(), "EMP001", email, hash, role)
    }

    fn service_with(users: Vec<User>) -> AuthService {
        let repository = Arc::new(InMemoryUserRepository::with_users(users));
        AuthService::new(repository, hasher(), jwt("test-secret"))
    }

    #[tokio::test]
    async fn test_login_success_and_verify() {
        let user = create_user("jane@example.com", UserRole::Employee);
        let service = service_with(vec![user.clone()]);

        let success = service
            .login(Credentials::new("jane@example.com", PASSWORD))
            .await
            .unwrap();

        assert_eq!(success.user, user.summary());
        assert!(!success.token.is_empty());

        let profile = service.verify(Some(success.token.as_str())).await.unwrap();
        assert_eq!(profile.id, *user.id());
        assert_eq!(profile.role, UserRole::Employee);
    }

    #[tokio::test]
    async fn test_login_token_expires_in_24_hours() {
        let user = create_user("jane@example.com", UserRole::Admin);
        let service = service_with(vec![user]);

        let before = chrono::Utc::now();
        let success = service
            .login(Credentials::new("jane@example.com", PASSWORD))
            .await
            .unwrap();

        let ttl = success.expires_at - before;
        assert!(ttl <= chrono::Duration::hours(24) + chrono::Duration::seconds(1));
        assert!(ttl >= chrono::Duration::hours(24) - chrono::Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = service_with(vec![create_user("jane@example.com", UserRole::Employee)]);

        let result = service
            .login(Credentials::new("nobody@example.com", PASSWORD))
            .await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_wrong_password_matches_unknown_email() {
        let service = service_with(vec![create_user("jane@example.com", UserRole::Employee)]);

        let wrong_password = service
            .login(Credentials::new("jane@example.com", "not-the-password"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(Credentials::new("ghost@example.com", "not-the-password"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_unknown_email_still_checks_a_hash() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok("$argon2id$placeholder".to_string()));
        hasher.expect_verify().times(1).returning(|_, _| false);

        let repository = Arc::new(InMemoryUserRepository::new());
        let service = AuthService::new(repository, Arc::new(hasher), jwt("test-secret"));

        let result = service
            .login(Credentials::new("nobody@example.com", PASSWORD))
            .await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_wrong_password_checks_one_hash() {
        let user = create_user("jane@example.com", UserRole::Employee);
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok("$argon2id$placeholder".to_string()));
        hasher.expect_verify().times(1).returning(|_, _| false);

        let repository = Arc::new(InMemoryUserRepository::with_users(vec![user]));
        let service = AuthService::new(repository, Arc::new(hasher), jwt("test-secret"));

        let result = service
            .login(Credentials::new("jane@example.com", "not-the-password"))
            .await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_and_verifications() {
        let cheap = Arc::new(Argon2Hasher::with_params(1024, 1, 1).unwrap());
        let users: Vec<User> = (0..8)
            .map(|i| {
                User::new(
                    UserId::generate(),
                    format!("EMP{:03}", i),
                    format!("user{}@example.com", i),
                    cheap.hash(PASSWORD).unwrap(),
                    UserRole::Employee,
                )
            })
            .collect();
        let repository = Arc::new(InMemoryUserRepository::with_users(users.clone()));
        let service = Arc::new(AuthService::new(repository, cheap, jwt("test-secret")));

        let mut tasks = tokio::task::JoinSet::new();
        for round in 0..64 {
            let service = service.clone();
            let user = users[round % users.len()].clone();
            let password = if round % 4 == 0 { "wrong-password" } else { PASSWORD };

            tasks.spawn(async move {
                let login = service
                    .login(Credentials::new(user.email(), password))
                    .await;

                match login {
                    Ok(success) => {
                        assert_ne!(password, "wrong-password");
                        assert_eq!(success.user, user.summary());

                        let profile = service.verify(Some(success.token.as_str())).await.unwrap();
                        assert_eq!(profile.id, *user.id());
                        assert_eq!(profile.email, user.email());
                    }
                    Err(err) => {
                        assert_eq!(password, "wrong-password");
                        assert_eq!(err, AuthError::InvalidCredentials);
                    }
                }
            });
        }

        let mut completed = 0;
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
            completed += 1;
        }
        assert_eq!(completed, 64);
    }

    #[tokio::test]
    async fn test_login_inactive_user() {
        let user = create_user("jane@example.com", UserRole::Employee).into_inactive();
        let service = service_with(vec![user]);

        let result = service
            .login(Credentials::new("jane@example.com", PASSWORD))
            .await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let service = service_with(vec![create_user("jane@example.com", UserRole::Employee)]);

        for (email, password) in [("", PASSWORD), ("jane@example.com", ""), ("", "")] {
            let result = service.login(Credentials::new(email, password)).await;
            assert_eq!(result, Err(AuthError::MissingFields));
        }
    }

    #[tokio::test]
    async fn test_login_email_is_exact_match() {
        let service = service_with(vec![create_user("jane@example.com", UserRole::Employee)]);

        let result = service
            .login(Credentials::new("JANE@example.com", PASSWORD))
            .await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_store_failure_is_internal() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_active_by_email()
            .returning(|_| Err(DomainError::storage("connection refused")));

        let service = AuthService::new(Arc::new(repository), hasher(), jwt("test-secret"));

        let result = service
            .login(Credentials::new("jane@example.com", PASSWORD))
            .await;

        assert_eq!(result, Err(AuthError::Internal));
        assert!(!result.unwrap_err().to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_login_signing_failure_is_internal() {
        let user = create_user("jane@example.com", UserRole::Employee);
        let repository = Arc::new(InMemoryUserRepository::with_users(vec![user]));

        let mut codec = MockTokenCodec::new();
        codec
            .expect_sign()
            .returning(|_, _| Err(DomainError::token("key unavailable")));

        let service = AuthService::new(repository, hasher(), Arc::new(codec));

        let result = service
            .login(Credentials::new("jane@example.com", PASSWORD))
            .await;

        assert_eq!(result, Err(AuthError::Internal));
    }

    #[tokio::test]
    async fn test_verify_without_token() {
        let service = service_with(vec![]);

        assert_eq!(
            service.verify(None).await,
            Err(AuthError::InvalidToken(TokenRejection::Missing))
        );
        assert_eq!(
            service.verify(Some("   ")).await,
            Err(AuthError::InvalidToken(TokenRejection::Missing))
        );
    }

    #[tokio::test]
    async fn test_verify_failures_are_indistinguishable() {
        let user = create_user("jane@example.com", UserRole::Employee);
        let service = service_with(vec![user.clone()]);

        let foreign = jwt("another-secret").sign(user.id(), user.role()).unwrap();

        let expired_claims = crate::domain::auth::TokenClaims {
            sub: user.id().to_string(),
            role: user.role(),
            iat: (chrono::Utc::now() - chrono::Duration::hours(30)).timestamp(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(6)).timestamp(),
        };
        let expired = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &expired_claims,
            &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let foreign_err = service.verify(Some(foreign.token.as_str())).await.unwrap_err();
        let expired_err = service.verify(Some(expired.as_str())).await.unwrap_err();
        let malformed_err = service.verify(Some("not.a.jwt")).await.unwrap_err();

        let expected = AuthError::InvalidToken(TokenRejection::Invalid);
        assert_eq!(foreign_err, expected);
        assert_eq!(expired_err, expected);
        assert_eq!(malformed_err, expected);
    }

    #[tokio::test]
    async fn test_verify_unknown_subject() {
        let service = service_with(vec![]);
        let issued = jwt("test-secret")
            .sign(&UserId::generate(), UserRole::Admin)
            .unwrap();

        assert_eq!(
            service.verify(Some(issued.token.as_str())).await,
            Err(AuthError::InvalidToken(TokenRejection::Invalid))
        );
    }

    #[tokio::test]
    async fn test_verify_is_idempotent() {
        let user = create_user("jane@example.com", UserRole::Employee);
        let service = service_with(vec![user]);

        let success = service
            .login(Credentials::new("jane@example.com", PASSWORD))
            .await
            .unwrap();

        let first = service.verify(Some(success.token.as_str())).await.unwrap();
        let second = service.verify(Some(success.token.as_str())).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_verify_store_failure_is_internal() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_id()
            .returning(|_| Err(DomainError::storage("timeout")));

        let codec = jwt("test-secret");
        let issued = codec.sign(&UserId::generate(), UserRole::Employee).unwrap();
        let service = AuthService::new(Arc::new(repository), hasher(), codec);

        assert_eq!(
            service.verify(Some(issued.token.as_str())).await,
            Err(AuthError::Internal)
        );
    }

    #[tokio::test]
    async fn test_verify_issues_single_lookup() {
        let user = create_user("jane@example.com", UserRole::Admin);
        let profile = user.profile();

        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(profile.clone())));

        let codec = jwt("test-secret");
        let issued = codec.sign(user.id(), user.role()).unwrap();
        let service = AuthService::new(Arc::new(repository), hasher(), codec);

        let resolved = service.verify(Some(issued.token.as_str())).await.unwrap();
        assert_eq!(resolved.email, "jane@example.com");
    }
}
