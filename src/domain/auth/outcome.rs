//! Authentication inputs and outcomes

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::user::UserSummary;

/// Email/password pair presented at login. Lives for one call only.
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> Credentials<'a> {
    pub fn new(email: &'a str, password: &'a str) -> Self {
        Self { email, password }
    }

    /// Both fields are present and non-empty
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

/// Why a presented token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// No token was presented
    Missing,
    /// Bad signature, expired, malformed, or unknown subject
    Invalid,
}

impl TokenRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Missing => "No token provided",
            Self::Invalid => "Invalid token",
        }
    }
}

/// Failure outcomes of login and token verification.
///
/// Messages never reveal whether an email exists, whether a password was
/// wrong, or why a token failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingFields,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{}", .0.message())]
    InvalidToken(TokenRejection),

    #[error("Internal authentication error")]
    Internal,
}

impl AuthError {
    /// Label used for metrics and logs
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidToken(TokenRejection::Missing) => "missing_token",
            Self::InvalidToken(TokenRejection::Invalid) => "invalid_token",
            Self::Internal => "internal_error",
        }
    }
}
