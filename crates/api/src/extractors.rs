//! Request extractors.
//!
//! The auth middleware stores the verified identity and, when the identity
//! has registered, its user row in the request extensions. These extractors
//! read them back.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;
use voyage_common::AppError;
use voyage_core::VerifiedIdentity;
use voyage_db::entities::user;

/// Registered, authenticated user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<user::Model>() {
            return Ok(Self(user.clone()));
        }
        if parts.extensions.get::<VerifiedIdentity>().is_some() {
            return Err(AppError::Forbidden(
                "Register a profile before using this endpoint".to_string(),
            ));
        }
        Err(AppError::Unauthorized)
    }
}

/// Optional authenticated user.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// Verified token holder, registered or not.
#[derive(Debug, Clone)]
pub struct Identity(pub VerifiedIdentity);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .map(Self)
            .ok_or(AppError::Unauthorized)
    }
}

/// `?limit=&offset=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    /// Page size; see [`Pagination::limit`].
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Rows to skip.
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// Upper bound for `limit`.
pub const MAX_LIMIT: u64 = 100;

impl Pagination {
    /// Requested page size, capped at [`MAX_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_capped() {
        let page = Pagination {
            limit: 500,
            offset: 0,
        };
        assert_eq!(page.limit(), MAX_LIMIT);
        assert_eq!(Pagination { limit: 0, offset: 0 }.limit(), 1);
        assert_eq!(Pagination::default().limit(), 20);
    }
}
