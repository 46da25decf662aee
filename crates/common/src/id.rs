//! ID generation utilities.

use ulid::Ulid;

/// Generator for entity IDs.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a lowercase ULID, 26 characters long.
    ///
    /// Post, like, comment and notification IDs all come from here, so
    /// string ordering on IDs roughly follows creation order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}
