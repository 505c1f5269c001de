//! Token claims and the codec seam used to sign and verify them

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::user::{UserId, UserRole, UserValidationError};
use crate::domain::DomainError;

/// Claims embedded in a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Role at the time of issuance
    pub role: UserRole,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for a subject, expiring `ttl` from now.
    ///
    /// Fails when the expiry falls outside the representable time range.
    pub fn new(subject: &UserId, role: UserRole, ttl: Duration) -> Result<Self, DomainError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::token("Token expiry is out of range"))?;

        Ok(Self {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires.timestamp(),
        })
    }

    /// Parse the subject back into a user ID
    pub fn subject(&self) -> Result<UserId, UserValidationError> {
        UserId::parse(&self.sub)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies bearer tokens with a process-wide secret
#[cfg_attr(test, automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token for the subject, expiring after the codec's TTL
    fn sign(&self, subject: &UserId, role: UserRole) -> Result<IssuedToken, DomainError>;

    /// Verify signature, structure and expiry, returning the claims
    fn verify(&self, token: &str) -> Result<TokenClaims, DomainError>;
}
