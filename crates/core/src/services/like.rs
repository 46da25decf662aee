//! Like service.

use chrono::Utc;
use feed_common::{AppError, AppResult, IdGenerator};
use feed_db::{
    entities::{like, notification},
    repositories::{LikeRepository, PostRepository},
};
use sea_orm::Set;

use crate::services::notification::for_post_author;

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeToggle {
    /// A like was created, with a notification unless the post is the
    /// liker's own.
    Liked {
        like: like::Model,
        notification: Option<notification::Model>,
    },
    /// The existing like was removed.
    Unliked,
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: LikeRepository, post_repo: PostRepository) -> Self {
        Self {
            like_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like the post, or unlike it if `user_id` already does.
    pub async fn toggle(&self, user_id: &str, post_id: &str) -> AppResult<LikeToggle> {
        let existing = self.like_repo.find_by_user_and_post(user_id, post_id).await?;

        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(post_id.to_string()))?;

        if existing.is_some() {
            self.like_repo
                .delete_by_user_and_post(user_id, post_id)
                .await?;
            tracing::debug!(user_id, post_id, "Post unliked");
            return Ok(LikeToggle::Unliked);
        }

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            post_id: Set(post_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        let notification = for_post_author(
            &self.id_gen,
            notification::NotificationType::Like,
            &post.author_id,
            user_id,
            post_id,
            None,
        );

        let (like, notification) = self
            .like_repo
            .create_with_notification(model, notification)
            .await?;
        tracing::debug!(user_id, post_id, notified = notification.is_some(), "Post liked");

        Ok(LikeToggle::Liked { like, notification })
    }
}
