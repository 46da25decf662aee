//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use feed_core::Envelope;
use serde::Serialize;

/// Standard API response wrapper for non-action endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response of a feed action.
///
/// The envelope goes out as JSON with status 200, failures included. An
/// action that did nothing for lack of a caller answers 204.
#[derive(Debug)]
pub struct ActionResponse<T>(pub Option<Envelope<T>>);

impl<T: Serialize> IntoResponse for ActionResponse<T> {
    fn into_response(self) -> Response {
        match self.0 {
            Some(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

impl<T> From<Envelope<T>> for ActionResponse<T> {
    fn from(envelope: Envelope<T>) -> Self {
        Self(Some(envelope))
    }
}

/// Empty success response.
#[must_use]
pub fn ok() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
