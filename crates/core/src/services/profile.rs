//! Profile service.

use feed_common::AppResult;
use feed_db::{
    entities::user,
    repositories::{PostRepository, UserRepository},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: Option<String>,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub posts_count: u64,
}

impl Profile {
    fn from_user(user: user::Model, posts_count: u64) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            bio: user.bio,
            image: user.image,
            location: user.location,
            website: user.website,
            created_at: user.created_at,
            posts_count,
        }
    }

    /// Page title and description for this profile.
    #[must_use]
    pub fn metadata(&self) -> ProfileMetadata {
        let title = self.name.clone().unwrap_or_else(|| self.username.clone());
        let description = match self.bio.as_deref() {
            Some(bio) if !bio.is_empty() => bio.to_string(),
            _ => format!("check out {}'s profile.", self.username),
        };
        ProfileMetadata { title, description }
    }
}

/// Document metadata of a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileMetadata {
    pub title: String,
    pub description: String,
}

/// The profile page: the requested username, plus the profile and its
/// metadata when the user exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfilePage {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProfileMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    user_repo: UserRepository,
    post_repo: PostRepository,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, post_repo: PostRepository) -> Self {
        Self {
            user_repo,
            post_repo,
        }
    }

    /// Look up a profile by username.
    pub async fn get_profile_by_username(&self, username: &str) -> AppResult<Option<Profile>> {
        let Some(user) = self.user_repo.find_by_username(username).await? else {
            return Ok(None);
        };
        let posts_count = self.post_repo.count_by_author(&user.id).await?;
        Ok(Some(Profile::from_user(user, posts_count)))
    }

    /// Assemble the profile page for `username`.
    pub async fn profile_page(&self, username: &str) -> AppResult<ProfilePage> {
        let profile = self.get_profile_by_username(username).await?;
        Ok(ProfilePage {
            username: username.to_string(),
            metadata: profile.as_ref().map(Profile::metadata),
            profile,
        })
    }
}
