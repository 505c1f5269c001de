//! HS256 JWT codec keyed by the process-wide signing secret

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt::Debug;

use crate::domain::auth::{IssuedToken, TokenClaims, TokenCodec};
use crate::domain::user::{UserId, UserRole};
use crate::domain::DomainError;

/// Longest token lifetime accepted from configuration (one year)
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;

/// Validated signing secret and token lifetime
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    expiration_hours: u64,
    ttl: Duration,
}

impl JwtConfig {
    /// Create a configuration, rejecting an empty secret and a lifetime
    /// outside `1..=MAX_TOKEN_TTL_HOURS`
    pub fn new(secret: impl Into<Vec<u8>>, expiration_hours: u64) -> Result<Self, DomainError> {
        let secret = secret.into();

        if secret.is_empty() {
            return Err(DomainError::configuration("JWT signing secret must not be empty"));
        }

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&expiration_hours) {
            return Err(DomainError::configuration(format!(
                "Token expiration must be between 1 and {} hours, got {}",
                MAX_TOKEN_TTL_HOURS, expiration_hours
            )));
        }

        let ttl = i64::try_from(expiration_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or_else(|| DomainError::configuration("Token expiration is out of range"))?;

        Ok(Self {
            secret,
            expiration_hours,
            ttl,
        })
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// JWT service implementation using a shared secret
#[derive(Clone)]
pub struct JwtService {
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl", &self.ttl)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.secret);
        let decoding_key = DecodingKey::from_secret(&config.secret);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            ttl: config.ttl,
            encoding_key,
            decoding_key,
            validation,
        }
    }
}

impl TokenCodec for JwtService {
    fn sign(&self, subject: &UserId, role: UserRole) -> Result<IssuedToken, DomainError> {
        let claims = TokenClaims::new(subject, role, self.ttl)?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::token(format!("Failed to generate JWT: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, DomainError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| DomainError::token(format!("Invalid JWT: {}", e)))?;

        Ok(token_data.claims)
    }
}
