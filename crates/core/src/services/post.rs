//! Post service.

use std::collections::HashMap;

use chrono::Utc;
use feed_common::{AppError, AppResult, IdGenerator};
use feed_db::{
    entities::post,
    repositories::{CommentRepository, LikeRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;

use crate::views::{AuthorSummary, FeedComment, FeedCounts, FeedPost, LikeRef};

/// Input for creating a post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    /// Stored as given, any length.
    pub content: String,

    /// Stored as given, except that an empty string is stored as no image
    /// (`None`) rather than as `""`.
    #[serde(default)]
    pub image_url: String,
}

/// An empty image reference means the post has no image.
fn image_from_url(url: String) -> Option<String> {
    Some(url).filter(|url| !url.is_empty())
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    like_repo: LikeRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        like_repo: LikeRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            like_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post owned by `author_id`.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        let image = image_from_url(input.image_url);

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author_id.to_string()),
            content: Set(input.content),
            image: Set(image),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.post_repo.create(model).await?;
        tracing::debug!(post_id = %created.id, author_id, "Post created");
        Ok(created)
    }

    /// Every post, newest first, with authors, comments and likes.
    ///
    /// Runs one query per table no matter how many posts there are.
    pub async fn list_feed(&self) -> AppResult<Vec<FeedPost>> {
        let posts = self.post_repo.find_all_newest_first().await?;
        if posts.is_empty() {
            return Ok(vec![]);
        }

        let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
        let comments = self.comment_repo.find_by_post_ids(&post_ids).await?;
        let likes = self.like_repo.find_by_post_ids(&post_ids).await?;

        let mut user_ids: Vec<String> = posts
            .iter()
            .map(|p| p.author_id.clone())
            .chain(comments.iter().map(|c| c.author_id.clone()))
            .collect();
        user_ids.sort();
        user_ids.dedup();

        let authors: HashMap<String, AuthorSummary> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id.clone(), AuthorSummary::from(u)))
            .collect();

        let mut comments_by_post: HashMap<String, Vec<FeedComment>> = HashMap::new();
        for comment in comments {
            // Rows whose author vanished mid-read are skipped.
            let Some(author) = authors.get(&comment.author_id) else {
                continue;
            };
            comments_by_post
                .entry(comment.post_id.clone())
                .or_default()
                .push(FeedComment {
                    author: author.clone(),
                    comment: comment.into(),
                });
        }

        let mut likes_by_post: HashMap<String, Vec<LikeRef>> = HashMap::new();
        for like in likes {
            likes_by_post
                .entry(like.post_id)
                .or_default()
                .push(LikeRef {
                    user_id: like.user_id,
                });
        }

        Ok(posts
            .into_iter()
            .filter_map(|p| {
                let author = authors.get(&p.author_id)?.clone();
                let comments = comments_by_post.remove(&p.id).unwrap_or_default();
                let likes = likes_by_post.remove(&p.id).unwrap_or_default();
                Some(FeedPost {
                    count: FeedCounts {
                        likes: likes.len(),
                        comments: comments.len(),
                    },
                    author,
                    comments,
                    likes,
                    post: p.into(),
                })
            })
            .collect())
    }

    /// Delete a post. Only its author may do so.
    pub async fn delete(&self, post_id: &str, caller_id: Option<&str>) -> AppResult<()> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(post_id.to_string()))?;

        if caller_id != Some(post.author_id.as_str()) {
            return Err(AppError::Forbidden(
                "Unauthorized - no delete permission".to_string(),
            ));
        }

        self.post_repo.delete(post_id).await?;
        tracing::debug!(post_id, "Post deleted");
        Ok(())
    }
}
