//! Repositories for database access.

mod comment;
mod like;
mod notification;
mod post;
mod user;

pub use comment::CommentRepository;
pub use like::LikeRepository;
pub use notification::NotificationRepository;
pub use post::PostRepository;
pub use user::UserRepository;
