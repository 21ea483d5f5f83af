use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;
use tracing::info;

use crate::domain::{FeedbackId, UserId};
use crate::entities::{feedback_replies, prelude::*, users};
use crate::models::feedback::FeedbackReply;

/// Repository for staff replies
pub struct ReplyRepository {
    conn: DatabaseConnection,
}

impl ReplyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: feedback_replies::Model, admin: Option<users::Model>) -> FeedbackReply {
        FeedbackReply {
            id: model.id,
            feedback: FeedbackId::new(model.feedback_id),
            admin: model.admin_id.map(UserId::new),
            admin_name: admin.map(|a| a.username),
            message: model.message,
            created_at: model.created_at,
        }
    }

    pub async fn add(&self, feedback: FeedbackId, admin: UserId, message: &str) -> Result<FeedbackReply> {
        let active_model = feedback_replies::ActiveModel {
            feedback_id: Set(feedback.value()),
            admin_id: Set(Some(admin.value())),
            message: Set(message.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert feedback reply")?;

        let admin_model = Users::find_by_id(admin.value()).one(&self.conn).await?;

        info!("Admin {} replied to feedback {}", admin, feedback);
        Ok(Self::map_model(model, admin_model))
    }

    pub async fn list_for_feedback(&self, feedback: FeedbackId) -> Result<Vec<FeedbackReply>> {
        let mut grouped = self.list_for_feedback_ids(&[feedback]).await?;
        Ok(grouped.remove(&feedback).unwrap_or_default())
    }

    /// Replies grouped by feedback, each group oldest first.
    pub async fn list_for_feedback_ids(
        &self,
        ids: &[FeedbackId],
    ) -> Result<HashMap<FeedbackId, Vec<FeedbackReply>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = FeedbackReplies::find()
            .filter(feedback_replies::Column::FeedbackId.is_in(ids.iter().map(|id| id.value())))
            .order_by_asc(feedback_replies::Column::CreatedAt)
            .order_by_asc(feedback_replies::Column::Id)
            .find_also_related(Users)
            .all(&self.conn)
            .await
            .context("Failed to list feedback replies")?;

        let mut grouped: HashMap<FeedbackId, Vec<FeedbackReply>> = HashMap::new();
        for (reply, admin) in rows {
            let reply = Self::map_model(reply, admin);
            grouped.entry(reply.feedback).or_default().push(reply);
        }

        Ok(grouped)
    }

    pub async fn count_for_feedback(&self, feedback: FeedbackId) -> Result<u64> {
        let count = FeedbackReplies::find()
            .filter(feedback_replies::Column::FeedbackId.eq(feedback.value()))
            .count(&self.conn)
            .await
            .context("Failed to count feedback replies")?;

        Ok(count)
    }
}
