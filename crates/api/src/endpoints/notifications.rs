//! Notifications endpoints.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use feed_common::AppResult;
use feed_core::{notification::DEFAULT_LIMIT, views::NotificationView};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUserId,
    middleware::AppState,
    response::{ApiResponse, ok},
};

/// List notifications request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsRequest {
    /// Maximum results (default: 20, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Cursor for pagination (before this ID)
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(list))
        .route("/unread-count", get(unread_count))
        .route("/mark-all-as-read", post(mark_all_as_read))
}

/// List the caller's notifications.
async fn list(
    AuthUserId(user_id): AuthUserId,
    State(state): State<AppState>,
    Json(req): Json<ListNotificationsRequest>,
) -> AppResult<ApiResponse<Vec<NotificationView>>> {
    let notifications = state
        .notification_service
        .list(&user_id, req.limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(notifications))
}

/// Count unread notifications.
async fn unread_count(
    AuthUserId(user_id): AuthUserId,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.notification_service.count_unread(&user_id).await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

/// Mark all notifications as read.
async fn mark_all_as_read(
    AuthUserId(user_id): AuthUserId,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.notification_service.mark_all_as_read(&user_id).await?;
    Ok(ok())
}
