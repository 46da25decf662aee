//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use feed_core::{
    FeedActions, IdentityResolver, InvalidationBroadcaster, NotificationService, ProfileService,
    TokenAuthenticator, TokenIdentity,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub actions: FeedActions,
    pub notification_service: NotificationService,
    pub profile_service: ProfileService,
    pub authenticator: TokenAuthenticator,
    pub invalidations: InvalidationBroadcaster,
}

/// Authentication middleware.
///
/// Attaches the request's identity for handlers to resolve. The token is
/// only looked up when a handler asks who is calling.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers()).map(ToString::to_string);
    tracing::trace!(has_token = token.is_some(), "Attaching request identity");
    let identity: Arc<dyn IdentityResolver> =
        Arc::new(TokenIdentity::new(state.authenticator.clone(), token));
    req.extensions_mut().insert(identity);

    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
