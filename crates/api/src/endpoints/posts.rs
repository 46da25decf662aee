//! Post endpoints: the feed actions.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use feed_core::{
    Envelope,
    actions::{CommentCreated, Done, PostCreated, PostList},
};
use serde::Deserialize;

use crate::{extractors::Identity, middleware::AppState, response::ActionResponse};

/// Create post request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub image_url: String,
}

/// Request naming a single post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostIdRequest {
    pub post_id: String,
}

/// Create comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: String,
    #[serde(default)]
    pub content: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/create", post(create))
        .route("/like", post(toggle_like))
        .route("/comment", post(comment))
        .route("/delete", post(delete))
}

async fn list(State(state): State<AppState>) -> Json<Envelope<PostList>> {
    Json(state.actions.get_posts().await)
}

async fn create(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(req): Json<CreatePostRequest>,
) -> ActionResponse<PostCreated> {
    ActionResponse(
        state
            .actions
            .create_post(identity.as_ref(), &req.content, &req.image_url)
            .await,
    )
}

async fn toggle_like(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(req): Json<PostIdRequest>,
) -> ActionResponse<Done> {
    ActionResponse(
        state
            .actions
            .toggle_like(identity.as_ref(), &req.post_id)
            .await,
    )
}

async fn comment(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(req): Json<CreateCommentRequest>,
) -> ActionResponse<CommentCreated> {
    ActionResponse(
        state
            .actions
            .create_comment(identity.as_ref(), &req.post_id, &req.content)
            .await,
    )
}

async fn delete(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(req): Json<PostIdRequest>,
) -> ActionResponse<Done> {
    state
        .actions
        .delete_post(identity.as_ref(), &req.post_id)
        .await
        .into()
}
