//! View invalidation.
//!
//! After a mutation the actions declare cached views stale. Delivery is
//! fire-and-forget: nothing an action does depends on whether anyone is
//! listening.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Path of the home feed view.
pub const HOME_PATH: &str = "/";

/// Receives "this path is stale" signals.
pub trait ViewInvalidator: Send + Sync {
    /// Mark the view at `path` as stale.
    fn invalidate(&self, path: &str);
}

/// Shared handle to a view invalidator.
pub type ViewInvalidatorService = Arc<dyn ViewInvalidator>;

/// Signal sent to subscribers of an [`InvalidationBroadcaster`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Invalidation {
    Invalidate { path: String },
}

/// Fans invalidation signals out to any number of subscribers.
#[derive(Debug, Clone)]
pub struct InvalidationBroadcaster {
    sender: broadcast::Sender<Invalidation>,
}

impl InvalidationBroadcaster {
    /// Create a broadcaster buffering up to `capacity` signals per
    /// subscriber. Slow subscribers lose the oldest ones.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InvalidationBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ViewInvalidator for InvalidationBroadcaster {
    fn invalidate(&self, path: &str) {
        let signal = Invalidation::Invalidate {
            path: path.to_string(),
        };
        // An error only means there are no subscribers right now.
        match self.sender.send(signal) {
            Ok(receivers) => tracing::debug!(path, receivers, "View invalidated"),
            Err(_) => tracing::trace!(path, "View invalidated with no subscribers"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every invalidated path.
    #[derive(Default)]
    pub struct RecordingInvalidator {
        paths: Mutex<Vec<String>>,
    }

    impl RecordingInvalidator {
        pub fn paths(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    impl ViewInvalidator for RecordingInvalidator {
        fn invalidate(&self, path: &str) {
            self.paths.lock().unwrap().push(path.to_string());
        }
    }

    #[test]
    fn test_signal_serializes_as_tagged_object() {
        let signal = Invalidation::Invalidate {
            path: HOME_PATH.to_string(),
        };

        assert_eq!(
            serde_json::to_value(&signal).unwrap(),
            serde_json::json!({ "type": "invalidate", "path": "/" })
        );
    }

    #[tokio::test]
    async fn test_broadcaster_reaches_subscribers() {
        let broadcaster = InvalidationBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 1);

        broadcaster.invalidate(HOME_PATH);

        assert_eq!(
            rx.recv().await.unwrap(),
            Invalidation::Invalidate {
                path: "/".to_string()
            }
        );
    }

    #[test]
    fn test_broadcaster_without_subscribers_does_not_fail() {
        let broadcaster = InvalidationBroadcaster::default();
        broadcaster.invalidate(HOME_PATH);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
