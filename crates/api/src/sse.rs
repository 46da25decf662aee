//! Server-Sent Events carrying view invalidations.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::middleware::AppState;

/// Stream of `{"type":"invalidate","path":...}` events.
///
/// Subscribers that fall behind skip the signals they missed.
async fn invalidations(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.invalidations.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|signal| {
            Ok(Event::default()
                .json_data(&signal)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    let initial = stream::once(async { Ok(Event::default().comment("connected")) });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// Create SSE router.
pub fn router() -> Router<AppState> {
    Router::new().route("/invalidations", get(invalidations))
}
