//! Core business logic for feed-rs.
//!
//! Services wrap the repositories of `feed-db`; [`actions::FeedActions`]
//! turns them into the feed's server-side actions.

pub mod actions;
pub mod services;
pub mod views;

pub use actions::{Envelope, FeedActions};
pub use services::*;
