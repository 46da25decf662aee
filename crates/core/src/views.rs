//! Serializable shapes returned by the feed actions.
//!
//! Field names are camelCase on the wire; the feed's nested counts live
//! under `_count`.

use feed_db::entities::{comment, notification, post, user};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Public part of a user shown next to posts, comments and notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub username: String,
}

impl From<&user::Model> for AuthorSummary {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            image: u.image.clone(),
            username: u.username.clone(),
        }
    }
}

/// A post row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl From<post::Model> for PostData {
    fn from(p: post::Model) -> Self {
        Self {
            id: p.id,
            author_id: p.author_id,
            content: p.content,
            image: p.image,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// A comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentData {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub post_id: String,
    pub created_at: DateTimeWithTimeZone,
}

impl From<comment::Model> for CommentData {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            content: c.content,
            author_id: c.author_id,
            post_id: c.post_id,
            created_at: c.created_at,
        }
    }
}

/// A comment as shown under a feed post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedComment {
    #[serde(flatten)]
    pub comment: CommentData,
    pub author: AuthorSummary,
}

/// Identifier of a user who liked a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRef {
    pub user_id: String,
}

/// Like and comment totals of a feed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedCounts {
    pub likes: usize,
    pub comments: usize,
}

/// A post with everything the home feed renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: PostData,
    pub author: AuthorSummary,
    /// Oldest first.
    pub comments: Vec<FeedComment>,
    pub likes: Vec<LikeRef>,
    #[serde(rename = "_count")]
    pub count: FeedCounts,
}

impl FeedPost {
    /// Whether `user_id` is among the likers.
    #[must_use]
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|l| l.user_id == user_id)
    }
}

/// A notification with its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: notification::NotificationType,
    pub is_read: bool,
    pub post_id: Option<String>,
    pub comment_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    /// `None` when the creator could not be loaded.
    pub creator: Option<AuthorSummary>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_feed_post_wire_shape() {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap().into();
        let author = AuthorSummary {
            id: "u1".to_string(),
            name: Some("Alice".to_string()),
            image: None,
            username: "alice".to_string(),
        };
        let feed_post = FeedPost {
            post: PostData {
                id: "p1".to_string(),
                author_id: "u1".to_string(),
                content: "hi".to_string(),
                image: None,
                created_at,
                updated_at: None,
            },
            author: author.clone(),
            comments: vec![],
            likes: vec![LikeRef {
                user_id: "u2".to_string(),
            }],
            count: FeedCounts {
                likes: 1,
                comments: 0,
            },
        };

        let value = serde_json::to_value(&feed_post).unwrap();

        assert_eq!(value["id"], json!("p1"));
        assert_eq!(value["authorId"], json!("u1"));
        assert_eq!(value["author"]["username"], json!("alice"));
        assert_eq!(value["likes"], json!([{ "userId": "u2" }]));
        assert_eq!(value["_count"], json!({ "likes": 1, "comments": 0 }));
        assert!(feed_post.is_liked_by("u2"));
        assert!(!feed_post.is_liked_by("u1"));
    }
}
