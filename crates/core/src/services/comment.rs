//! Comment service.

use chrono::Utc;
use feed_common::{AppError, AppResult, IdGenerator};
use feed_db::{
    entities::{comment, notification},
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::notification::for_post_author;

/// Input for commenting on a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub post_id: String,

    #[validate(length(min = 1, message = "Content is required"))]
    #[serde(default)]
    pub content: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comment on a post, notifying its author unless they wrote the
    /// comment themselves.
    pub async fn create(
        &self,
        author_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<(comment::Model, Option<notification::Model>)> {
        input.validate()?;
        let post_id = input.post_id.as_str();

        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(post_id.to_string()))?;

        // Generated up front so the notification can point at it.
        let comment_id = self.id_gen.generate();

        let model = comment::ActiveModel {
            id: Set(comment_id.clone()),
            content: Set(input.content.clone()),
            author_id: Set(author_id.to_string()),
            post_id: Set(post_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        let notification = for_post_author(
            &self.id_gen,
            notification::NotificationType::Comment,
            &post.author_id,
            author_id,
            post_id,
            Some(&comment_id),
        );

        let (comment, notification) = self
            .comment_repo
            .create_with_notification(model, notification)
            .await?;
        tracing::debug!(comment_id = %comment.id, post_id, "Comment created");

        Ok((comment, notification))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::post::tests::{create_test_comment, create_test_post};
    use feed_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn input(post_id: &str, content: &str) -> CreateCommentInput {
        CreateCommentInput {
            post_id: post_id.to_string(),
            content: content.to_string(),
        }
    }

    fn comment_service(db: MockDatabase) -> CommentService {
        let db = Arc::new(db.into_connection());
        CommentService::new(CommentRepository::new(db.clone()), PostRepository::new(db))
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected_before_any_query() {
        let svc = comment_service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = svc.create("bob", input("p1", "")).await;

        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("Content is required")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_comment_on_own_post_has_no_notification() {
        let svc = comment_service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "alice")]])
                .append_query_results([[create_test_comment("c1", "p1", "alice")]]),
        );

        let (comment, notification) = svc.create("alice", input("p1", "nice")).await.unwrap();

        assert_eq!(comment.id, "c1");
        assert!(notification.is_none());
    }

    #[tokio::test]
    async fn test_comment_on_other_post_notifies_author() {
        let svc = comment_service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "alice")]])
                .append_query_results([[create_test_comment("c1", "p1", "bob")]])
                .append_query_results([[notification::Model {
                    id: "n1".to_string(),
                    user_id: "alice".to_string(),
                    creator_id: "bob".to_string(),
                    notification_type: notification::NotificationType::Comment,
                    post_id: Some("p1".to_string()),
                    comment_id: Some("c1".to_string()),
                    is_read: false,
                    created_at: Utc::now().into(),
                }]]),
        );

        let (_, notification) = svc.create("bob", input("p1", "nice")).await.unwrap();
        let notification = notification.unwrap();

        assert_eq!(notification.user_id, "alice");
        assert_eq!(notification.comment_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let svc = comment_service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()]),
        );

        let result = svc.create("bob", input("missing", "hi")).await;
        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }
}
