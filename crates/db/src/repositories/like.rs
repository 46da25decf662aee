//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like, notification};
use feed_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the like a user left on a post.
    pub async fn find_by_user_and_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All likes on the given posts.
    pub async fn find_by_post_ids(&self, post_ids: &[String]) -> AppResult<Vec<like::Model>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        Like::find()
            .filter(like::Column::PostId.is_in(post_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a like and, when given, its notification in one transaction.
    ///
    /// Neither row is visible unless both inserts succeed.
    pub async fn create_with_notification(
        &self,
        like: like::ActiveModel,
        notification: Option<notification::ActiveModel>,
    ) -> AppResult<(like::Model, Option<notification::Model>)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let like = like
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let notification = match notification {
            Some(model) => Some(
                model
                    .insert(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?,
            ),
            None => None,
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((like, notification))
    }

    /// Delete the like keyed by `(user_id, post_id)`.
    ///
    /// Only the caller's own row can match, whatever row was read earlier.
    pub async fn delete_by_user_and_post(&self, user_id: &str, post_id: &str) -> AppResult<u64> {
        let result = Like::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
