//! User endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use feed_common::AppResult;
use feed_core::ProfilePage;

use crate::{middleware::AppState, response::ApiResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/{username}/profile", get(profile))
}

/// Profile page of a user.
///
/// Unknown usernames still get a page, without profile or metadata.
async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ProfilePage>> {
    let page = state.profile_service.profile_page(&username).await?;
    Ok(ApiResponse::ok(page))
}
