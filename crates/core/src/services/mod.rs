//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod identity;
pub mod invalidation;
pub mod like;
pub mod notification;
pub mod post;
pub mod profile;

pub use comment::{CommentService, CreateCommentInput};
pub use identity::{Caller, IdentityResolver, TokenAuthenticator, TokenIdentity};
pub use invalidation::{
    HOME_PATH, Invalidation, InvalidationBroadcaster, ViewInvalidator, ViewInvalidatorService,
};
pub use like::{LikeService, LikeToggle};
pub use notification::NotificationService;
pub use post::{CreatePostInput, PostService};
pub use profile::{Profile, ProfileMetadata, ProfilePage, ProfileService};
