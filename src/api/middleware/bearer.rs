//! Bearer token extraction from the `Authorization` header

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Raw token presented by the caller, if any.
///
/// Extraction never fails: an absent header yields `None` and the auth
/// service decides how to answer. A header that does not use the Bearer
/// scheme is passed through whole so it is rejected as an invalid token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_bearer_token(&parts.headers)))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?;
    let value = String::from_utf8_lossy(value.as_bytes());

    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(&value);
    Some(token.trim().to_string())
}
