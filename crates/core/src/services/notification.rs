//! Notification service.

use std::collections::HashMap;

use chrono::Utc;
use feed_common::{AppResult, IdGenerator};
use feed_db::{
    entities::notification::{self, NotificationType},
    repositories::{NotificationRepository, UserRepository},
};
use sea_orm::Set;

use crate::views::{AuthorSummary, NotificationView};

/// Default page size of the inbox.
pub const DEFAULT_LIMIT: u64 = 20;
/// Largest page size of the inbox.
pub const MAX_LIMIT: u64 = 100;

/// Build the notification telling a post author about someone else's
/// activity on their post.
///
/// Returns `None` when the actor is the author: nobody is notified about
/// their own likes or comments.
pub(crate) fn for_post_author(
    id_gen: &IdGenerator,
    notification_type: NotificationType,
    post_author_id: &str,
    actor_id: &str,
    post_id: &str,
    comment_id: Option<&str>,
) -> Option<notification::ActiveModel> {
    if post_author_id == actor_id {
        return None;
    }

    Some(notification::ActiveModel {
        id: Set(id_gen.generate()),
        user_id: Set(post_author_id.to_string()),
        creator_id: Set(actor_id.to_string()),
        notification_type: Set(notification_type),
        post_id: Set(Some(post_id.to_string())),
        comment_id: Set(comment_id.map(ToString::to_string)),
        is_read: Set(false),
        created_at: Set(Utc::now().into()),
    })
}

/// Recipient-side notification reads.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository, user_repo: UserRepository) -> Self {
        Self {
            notification_repo,
            user_repo,
        }
    }

    /// List a user's notifications, newest first.
    ///
    /// `limit` is clamped to `1..=100`.
    pub async fn list(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<NotificationView>> {
        let limit = limit.clamp(1, MAX_LIMIT);
        let notifications = self
            .notification_repo
            .find_by_user(user_id, limit, until_id)
            .await?;

        let mut creator_ids: Vec<String> =
            notifications.iter().map(|n| n.creator_id.clone()).collect();
        creator_ids.sort();
        creator_ids.dedup();

        let creators: HashMap<String, AuthorSummary> = self
            .user_repo
            .find_by_ids(&creator_ids)
            .await?
            .iter()
            .map(|u| (u.id.clone(), AuthorSummary::from(u)))
            .collect();

        Ok(notifications
            .into_iter()
            .map(|n| NotificationView {
                creator: creators.get(&n.creator_id).cloned(),
                id: n.id,
                notification_type: n.notification_type,
                is_read: n.is_read,
                post_id: n.post_id,
                comment_id: n.comment_id,
                created_at: n.created_at,
            })
            .collect())
    }

    /// Number of unread notifications.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }

    /// Mark every notification of the user as read. Returns how many changed.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        let updated = self.notification_repo.mark_all_as_read(user_id).await?;
        tracing::debug!(user_id, updated, "Marked notifications as read");
        Ok(updated)
    }
}
