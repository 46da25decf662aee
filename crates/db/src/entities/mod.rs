//! Database entities.

#![allow(missing_docs)]

pub mod comment;
pub mod like;
pub mod notification;
pub mod post;
pub mod user;

pub use comment::Entity as Comment;
pub use like::Entity as Like;
pub use notification::Entity as Notification;
pub use post::Entity as Post;
pub use user::Entity as User;
