//! Feed actions.
//!
//! Each action resolves the caller, runs the matching service, marks the
//! home view stale, and reports the outcome as an [`Envelope`]. Errors never
//! escape an action: they are logged and replaced with a fixed failure
//! message. Actions that need a signed-in caller return `None` when there
//! is none.

#![allow(missing_docs)]

use feed_common::{AppError, AppResult};
use serde::{Serialize, Serializer};

use crate::services::{
    comment::{CommentService, CreateCommentInput},
    identity::IdentityResolver,
    invalidation::{HOME_PATH, ViewInvalidatorService},
    like::LikeService,
    post::{CreatePostInput, PostService},
};
use crate::views::{CommentData, FeedPost, PostData};

/// Outcome of an action.
///
/// Serializes as `{"success": true, ...payload}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Success(T),
    Failure(String),
}

impl<T> Envelope<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }
}

#[derive(Serialize)]
struct SuccessBody<'a, T> {
    success: bool,
    #[serde(flatten)]
    payload: &'a T,
}

#[derive(Serialize)]
struct FailureBody<'a> {
    success: bool,
    error: &'a str,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(payload) => SuccessBody {
                success: true,
                payload,
            }
            .serialize(serializer),
            Self::Failure(error) => FailureBody {
                success: false,
                error,
            }
            .serialize(serializer),
        }
    }
}

/// Payload of a successful create post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCreated {
    pub post: PostData,
}

/// Payload of a successful list posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostList {
    pub posts: Vec<FeedPost>,
}

/// Payload of a successful create comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentCreated {
    pub comment: CommentData,
}

/// Payload of actions that report nothing beyond success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Done {}

/// Failure messages, one per action.
pub mod failure {
    pub const CREATE_POST: &str = "Failed to create post";
    pub const GET_POSTS: &str = "Failed to get posts";
    pub const TOGGLE_LIKE: &str = "Failed to toggle like";
    pub const CREATE_COMMENT: &str = "Failed to create comment";
    pub const DELETE_POST: &str = "Failed to delete post";
}

/// The feed's server-side actions.
#[derive(Clone)]
pub struct FeedActions {
    posts: PostService,
    likes: LikeService,
    comments: CommentService,
    invalidator: ViewInvalidatorService,
}

impl FeedActions {
    #[must_use]
    pub fn new(
        posts: PostService,
        likes: LikeService,
        comments: CommentService,
        invalidator: ViewInvalidatorService,
    ) -> Self {
        Self {
            posts,
            likes,
            comments,
            invalidator,
        }
    }

    /// Publish a post as the caller.
    pub async fn create_post(
        &self,
        identity: &dyn IdentityResolver,
        content: &str,
        image_url: &str,
    ) -> Option<Envelope<PostCreated>> {
        let result = self.try_create_post(identity, content, image_url).await;
        settle("create_post", failure::CREATE_POST, result)
    }

    async fn try_create_post(
        &self,
        identity: &dyn IdentityResolver,
        content: &str,
        image_url: &str,
    ) -> AppResult<Option<PostCreated>> {
        let Some(user_id) = identity.current_user_id().await? else {
            return Ok(None);
        };

        let input = CreatePostInput {
            content: content.to_string(),
            image_url: image_url.to_string(),
        };
        let post = self.posts.create(&user_id, input).await?;
        self.invalidator.invalidate(HOME_PATH);

        Ok(Some(PostCreated { post: post.into() }))
    }

    /// The home feed.
    pub async fn get_posts(&self) -> Envelope<PostList> {
        match self.posts.list_feed().await {
            Ok(posts) => Envelope::Success(PostList { posts }),
            Err(e) => fail("get_posts", failure::GET_POSTS, &e),
        }
    }

    /// Like or unlike a post as the caller.
    pub async fn toggle_like(
        &self,
        identity: &dyn IdentityResolver,
        post_id: &str,
    ) -> Option<Envelope<Done>> {
        let result = self.try_toggle_like(identity, post_id).await;
        settle("toggle_like", failure::TOGGLE_LIKE, result)
    }

    async fn try_toggle_like(
        &self,
        identity: &dyn IdentityResolver,
        post_id: &str,
    ) -> AppResult<Option<Done>> {
        let Some(user_id) = identity.current_user_id().await? else {
            return Ok(None);
        };

        self.likes.toggle(&user_id, post_id).await?;
        self.invalidator.invalidate(HOME_PATH);

        Ok(Some(Done {}))
    }

    /// Comment on a post as the caller.
    pub async fn create_comment(
        &self,
        identity: &dyn IdentityResolver,
        post_id: &str,
        content: &str,
    ) -> Option<Envelope<CommentCreated>> {
        let result = self.try_create_comment(identity, post_id, content).await;
        settle("create_comment", failure::CREATE_COMMENT, result)
    }

    async fn try_create_comment(
        &self,
        identity: &dyn IdentityResolver,
        post_id: &str,
        content: &str,
    ) -> AppResult<Option<CommentCreated>> {
        let Some(user_id) = identity.current_user_id().await? else {
            return Ok(None);
        };

        let input = CreateCommentInput {
            post_id: post_id.to_string(),
            content: content.to_string(),
        };
        let (comment, _) = self.comments.create(&user_id, input).await?;
        self.invalidator.invalidate(HOME_PATH);

        Ok(Some(CommentCreated {
            comment: comment.into(),
        }))
    }

    /// Delete one of the caller's posts.
    ///
    /// An anonymous caller gets the failure envelope rather than `None`.
    pub async fn delete_post(
        &self,
        identity: &dyn IdentityResolver,
        post_id: &str,
    ) -> Envelope<Done> {
        match self.try_delete_post(identity, post_id).await {
            Ok(done) => Envelope::Success(done),
            Err(e) => fail("delete_post", failure::DELETE_POST, &e),
        }
    }

    async fn try_delete_post(
        &self,
        identity: &dyn IdentityResolver,
        post_id: &str,
    ) -> AppResult<Done> {
        let user_id = identity.current_user_id().await?;

        self.posts.delete(post_id, user_id.as_deref()).await?;
        self.invalidator.invalidate(HOME_PATH);

        Ok(Done {})
    }
}

fn settle<T>(
    action: &'static str,
    message: &'static str,
    result: AppResult<Option<T>>,
) -> Option<Envelope<T>> {
    match result {
        Ok(payload) => payload.map(Envelope::Success),
        Err(e) => Some(fail(action, message, &e)),
    }
}

fn fail<T>(action: &'static str, message: &'static str, error: &AppError) -> Envelope<T> {
    tracing::error!(action, error = %error, "Feed action failed");
    Envelope::Failure(message.to_string())
}
