//! Caller identity.
//!
//! Actions never look at transport credentials themselves; they ask an
//! [`IdentityResolver`] for the internal user ID of whoever is calling.

use async_trait::async_trait;
use feed_common::AppResult;
use feed_db::{entities::user, repositories::UserRepository};

/// Maps the current caller to an internal user ID.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// The caller's user ID, or `None` for an anonymous caller.
    async fn current_user_id(&self) -> AppResult<Option<String>>;
}

/// An identity that has already been resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller(Option<String>);

impl Caller {
    /// An anonymous caller.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }

    /// A signed-in caller.
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl IdentityResolver for Caller {
    async fn current_user_id(&self) -> AppResult<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Resolves bearer tokens to users.
#[derive(Clone)]
pub struct TokenAuthenticator {
    user_repo: UserRepository,
}

impl TokenAuthenticator {
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Look up the user owning `token`.
    pub async fn authenticate(&self, token: &str) -> AppResult<Option<user::Model>> {
        if token.is_empty() {
            return Ok(None);
        }
        self.user_repo.find_by_token(token).await
    }

    /// Resolve an optional token straight to a [`Caller`].
    pub async fn caller(&self, token: Option<&str>) -> AppResult<Caller> {
        let Some(token) = token else {
            return Ok(Caller::anonymous());
        };

        Ok(match self.authenticate(token).await? {
            Some(user) => Caller::user(user.id),
            None => Caller::anonymous(),
        })
    }
}

/// A bearer token that is looked up only when an action asks for the
/// caller.
#[derive(Clone)]
pub struct TokenIdentity {
    authenticator: TokenAuthenticator,
    token: Option<String>,
}

impl TokenIdentity {
    #[must_use]
    pub const fn new(authenticator: TokenAuthenticator, token: Option<String>) -> Self {
        Self {
            authenticator,
            token,
        }
    }
}

#[async_trait]
impl IdentityResolver for TokenIdentity {
    async fn current_user_id(&self) -> AppResult<Option<String>> {
        let caller = self.authenticator.caller(self.token.as_deref()).await?;
        Ok(caller.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, token: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user_{id}"),
            name: None,
            bio: None,
            image: None,
            location: None,
            website: None,
            token: Some(token.to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_caller_resolves_to_itself() {
        assert_eq!(
            Caller::user("u1").current_user_id().await.unwrap(),
            Some("u1".to_string())
        );
        assert_eq!(Caller::anonymous().current_user_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_token_resolves_to_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1", "secret")]])
                .into_connection(),
        );

        let auth = TokenAuthenticator::new(UserRepository::new(db));
        let caller = auth.caller(Some("secret")).await.unwrap();

        assert_eq!(caller.user_id(), Some("u1"));
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let auth = TokenAuthenticator::new(UserRepository::new(db));

        assert_eq!(auth.caller(Some("nope")).await.unwrap(), Caller::anonymous());
    }

    #[tokio::test]
    async fn test_token_identity_resolves_lazily() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("u1", "secret")]])
                .into_connection(),
        );
        let auth = TokenAuthenticator::new(UserRepository::new(db));

        let identity = TokenIdentity::new(auth, Some("secret".to_string()));

        assert_eq!(
            identity.current_user_id().await.unwrap(),
            Some("u1".to_string())
        );
    }

    #[tokio::test]
    async fn test_token_identity_surfaces_lookup_errors() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let auth = TokenAuthenticator::new(UserRepository::new(db));

        let identity = TokenIdentity::new(auth, Some("secret".to_string()));

        assert!(identity.current_user_id().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_or_empty_token_skips_lookup() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let auth = TokenAuthenticator::new(UserRepository::new(db));

        assert_eq!(auth.caller(None).await.unwrap(), Caller::anonymous());
        assert_eq!(auth.caller(Some("")).await.unwrap(), Caller::anonymous());
    }
}
