//! Request extractors.

use std::{convert::Infallible, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};
use feed_common::AppError;
use feed_core::{Caller, IdentityResolver};

/// The caller's identity, as attached by the auth middleware.
///
/// Requests that bypassed the middleware are anonymous.
#[derive(Clone)]
pub struct Identity(pub Arc<dyn IdentityResolver>);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resolver = parts
            .extensions
            .get::<Arc<dyn IdentityResolver>>()
            .cloned()
            .unwrap_or_else(|| Arc::new(Caller::anonymous()));
        Ok(Self(resolver))
    }
}

/// ID of a signed-in caller. Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUserId(pub String);

impl<S> FromRequestParts<S> for AuthUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(Identity(resolver)) = Identity::from_request_parts(parts, state).await;
        resolver
            .current_user_id()
            .await?
            .map(Self)
            .ok_or(AppError::Unauthorized)
    }
}
