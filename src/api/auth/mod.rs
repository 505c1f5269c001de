//! Authentication API endpoints
//!
//! `POST /auth/login` exchanges an email/password pair for a signed token and
//! `POST /auth/verify` resolves a bearer token back to its user.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::BearerToken;
use crate::api::state::AppState;
use crate::api::types::{Json, JsonRejection};
use crate::domain::auth::{AuthError, Credentials, LoginSuccess};
use crate::domain::user::{UserProfile, UserSummary};

const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";
const LOGIN_SERVER_ERROR: &str = "Server error during login";
const VERIFY_SERVER_ERROR: &str = "Server error during token verification";

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/verify", post(verify))
}

/// Login request. Both fields are optional so that a missing field is
/// reported as a 400 with the standard message rather than a parse error.
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl From<LoginSuccess> for LoginResponse {
    fn from(success: LoginSuccess) -> Self {
        Self {
            message: LOGIN_SUCCESS_MESSAGE,
            token: success.token,
            expires_at: success.expires_at,
            user: success.user,
        }
    }
}

/// Verify response: `{valid: true, user}` or `{valid: false, message}`
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

/// Login failure rendered as `{message}`
#[derive(Debug)]
pub struct LoginError(pub AuthError);

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AuthError::MissingFields => (StatusCode::BAD_REQUEST, self.0.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, self.0.to_string())
            }
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                LOGIN_SERVER_ERROR.to_string(),
            ),
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

/// Verify failure rendered as `{valid: false, message}`
#[derive(Debug)]
pub struct VerifyError(pub AuthError);

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                VERIFY_SERVER_ERROR.to_string(),
            ),
            other => (StatusCode::UNAUTHORIZED, other.to_string()),
        };

        let body = VerifyResponse {
            valid: false,
            user: None,
            message: Some(message),
        };

        (status, Json(body)).into_response()
    }
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, LoginError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(status = %rejection.status(), reason = %rejection.message(), "Unreadable login body");
            LoginRequest::default()
        }
    };

    let credentials = Credentials::new(
        request.email.as_deref().unwrap_or_default(),
        request.password.as_deref().unwrap_or_default(),
    );

    let success = state
        .auth_service
        .login(credentials)
        .await
        .map_err(LoginError)?;

    Ok(Json(LoginResponse::from(success)))
}

/// Verify a bearer token
///
/// POST /auth/verify
pub async fn verify(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<VerifyResponse>, VerifyError> {
    let user = state
        .auth_service
        .verify(token.as_deref())
        .await
        .map_err(VerifyError)?;

    Ok(Json(VerifyResponse {
        valid: true,
        user: Some(user),
        message: None,
    }))
}
