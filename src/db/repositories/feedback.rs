use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::{FeedbackId, UserId};
use crate::entities::{feedback, feedback_replies, prelude::*};
use crate::models::feedback::{Feedback as FeedbackRecord, FeedbackInput};

/// Repository for feedback rows
pub struct FeedbackRepository {
    conn: DatabaseConnection,
}

impl FeedbackRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: feedback::Model) -> FeedbackRecord {
        FeedbackRecord {
            id: FeedbackId::new(model.id),
            author: model.author_id.map(UserId::new),
            name: model.name,
            email: model.email,
            message: model.message,
            created_at: model.created_at,
        }
    }

    pub async fn add(&self, author: Option<UserId>, input: &FeedbackInput) -> Result<FeedbackRecord> {
        let active_model = feedback::ActiveModel {
            author_id: Set(author.map(i32::from)),
            name: Set(input.name.clone()),
            email: Set(input.email.clone()),
            message: Set(input.message.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert feedback")?;

        info!("Stored feedback {} from author {:?}", model.id, model.author_id);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: FeedbackId) -> Result<Option<FeedbackRecord>> {
        let model = Feedback::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query feedback")?;

        Ok(model.map(Self::map_model))
    }

    pub async fn list_all(&self) -> Result<Vec<FeedbackRecord>> {
        let rows = Feedback::find()
            .order_by_desc(feedback::Column::CreatedAt)
            .order_by_desc(feedback::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list feedback")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_author(&self, author: UserId) -> Result<Vec<FeedbackRecord>> {
        let rows = Feedback::find()
            .filter(feedback::Column::AuthorId.eq(author.value()))
            .order_by_desc(feedback::Column::CreatedAt)
            .order_by_desc(feedback::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list feedback by author")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Overwrites name/email/message; `created_at` and the author are kept.
    pub async fn update(&self, id: FeedbackId, input: &FeedbackInput) -> Result<Option<FeedbackRecord>> {
        let txn = self.conn.begin().await?;

        let Some(model) = Feedback::find_by_id(id.value()).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let mut active: feedback::ActiveModel = model.into();
        active.name = Set(input.name.clone());
        active.email = Set(input.email.clone());
        active.message = Set(input.message.clone());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!("Updated feedback {}", updated.id);
        Ok(Some(Self::map_model(updated)))
    }

    /// Deletes the feedback and all of its replies in one transaction.
    pub async fn remove(&self, id: FeedbackId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        feedback_replies::Entity::delete_many()
            .filter(feedback_replies::Column::FeedbackId.eq(id.value()))
            .exec(&txn)
            .await?;

        let result = Feedback::delete_by_id(id.value()).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed feedback with ID: {}", id);
        }
        Ok(removed)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = Feedback::find()
            .count(&self.conn)
            .await
            .context("Failed to count feedback")?;

        Ok(count)
    }
}
