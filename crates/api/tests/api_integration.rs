//! API integration tests.
//!
//! These drive the full router, auth middleware included, against a mock
//! database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use feed_api::{AppState, auth_middleware, router as api_router};
use feed_core::{
    CommentService, FeedActions, Invalidation, InvalidationBroadcaster, LikeService,
    NotificationService, PostService, ProfileService, TokenAuthenticator,
};
use feed_db::entities::{comment, like, post, user};
use feed_db::repositories::{
    CommentRepository, LikeRepository, NotificationRepository, PostRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        name: None,
        bio: None,
        image: None,
        location: None,
        website: None,
        token: Some(format!("{username}-token")),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn create_test_post(id: &str, author_id: &str) -> post::Model {
    post::Model {
        id: id.to_string(),
        author_id: author_id.to_string(),
        content: "hello".to_string(),
        image: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Create test app state over the given mock database.
fn create_test_state(db: MockDatabase) -> AppState {
    let db = Arc::new(db.into_connection());

    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    let invalidations = InvalidationBroadcaster::new(16);

    let actions = FeedActions::new(
        PostService::new(
            post_repo.clone(),
            comment_repo.clone(),
            like_repo.clone(),
            user_repo.clone(),
        ),
        LikeService::new(like_repo, post_repo.clone()),
        CommentService::new(comment_repo, post_repo.clone()),
        Arc::new(invalidations.clone()),
    );

    AppState {
        actions,
        notification_service: NotificationService::new(notification_repo, user_repo.clone()),
        profile_service: ProfileService::new(user_repo.clone(), post_repo),
        authenticator: TokenAuthenticator::new(user_repo),
        invalidations,
    }
}

fn create_test_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn json_request(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_list_posts() {
    let state = create_test_state(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_post("p1", "u1")]])
            .append_query_results([Vec::<comment::Model>::new()])
            .append_query_results([Vec::<like::Model>::new()])
            .append_query_results([[create_test_user("u1", "alice")]]),
    );
    let app = create_test_app(state);

    let response = app
        .oneshot(Request::get("/api/posts").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["posts"][0]["author"]["username"], json!("alice"));
    assert_eq!(body["posts"][0]["_count"], json!({ "likes": 0, "comments": 0 }));
}

#[tokio::test]
async fn test_create_post_without_token_is_no_content() {
    let app = create_test_app(create_test_state(MockDatabase::new(DatabaseBackend::Postgres)));

    let response = app
        .oneshot(json_request(
            "/api/posts/create",
            None,
            &json!({ "content": "hi", "imageUrl": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_create_post_broadcasts_invalidation() {
    let state = create_test_state(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user("u1", "alice")]])
            .append_query_results([[create_test_post("p1", "u1")]]),
    );
    let mut rx = state.invalidations.subscribe();
    let app = create_test_app(state);

    let response = app
        .oneshot(json_request(
            "/api/posts/create",
            Some("alice-token"),
            &json!({ "content": "hello", "imageUrl": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["post"]["id"], json!("p1"));
    assert_eq!(body["post"]["authorId"], json!("u1"));

    assert_eq!(
        rx.try_recv().unwrap(),
        Invalidation::Invalidate {
            path: "/".to_string()
        }
    );
}

#[tokio::test]
async fn test_empty_comment_returns_failure_envelope() {
    let state = create_test_state(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user("u2", "bob")]]),
    );
    let app = create_test_app(state);

    let response = app
        .oneshot(json_request(
            "/api/posts/comment",
            Some("bob-token"),
            &json!({ "postId": "p1", "content": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Failed to create comment" })
    );
}

#[tokio::test]
async fn test_anonymous_delete_is_a_failure() {
    let state = create_test_state(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_post("p1", "u1")]]),
    );
    let app = create_test_app(state);

    let response = app
        .oneshot(json_request(
            "/api/posts/delete",
            None,
            &json!({ "postId": "p1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Failed to delete post" })
    );
}

#[tokio::test]
async fn test_notifications_require_sign_in() {
    let app = create_test_app(create_test_state(MockDatabase::new(DatabaseBackend::Postgres)));

    let response = app
        .oneshot(
            Request::get("/api/notifications/unread-count")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unread_count_for_signed_in_user() {
    let state = create_test_state(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_user("u1", "alice")]])
            .append_query_results([[std::collections::BTreeMap::from([(
                "num_items",
                sea_orm::Value::BigInt(Some(2)),
            )])]]),
    );
    let app = create_test_app(state);

    let response = app
        .oneshot(
            Request::get("/api/notifications/unread-count")
                .header(header::AUTHORIZATION, "Bearer alice-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "data": { "count": 2 } }));
}

#[tokio::test]
async fn test_profile_of_unknown_user() {
    let state = create_test_state(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()]),
    );
    let app = create_test_app(state);

    let response = app
        .oneshot(
            Request::get("/api/users/nobody/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "data": { "username": "nobody" } })
    );
}
