//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment, notification};
use feed_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All comments on the given posts, oldest first.
    pub async fn find_by_post_ids(&self, post_ids: &[String]) -> AppResult<Vec<comment::Model>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        Comment::find()
            .filter(comment::Column::PostId.is_in(post_ids.to_vec()))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a comment and, when given, its notification in one
    /// transaction.
    ///
    /// The notification is inserted second, after the comment row it
    /// references exists.
    pub async fn create_with_notification(
        &self,
        comment: comment::ActiveModel,
        notification: Option<notification::ActiveModel>,
    ) -> AppResult<(comment::Model, Option<notification::Model>)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let comment = comment
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

        Ok((comment, notification))
    }
}
