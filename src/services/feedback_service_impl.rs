//! `SeaORM` implementation of the `FeedbackService` trait.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::db::Store;
use crate::domain::{CurrentUser, DashboardQuery, FeedbackId, filter, policy};
use crate::models::feedback::{Feedback, FeedbackInput, FeedbackReply, FeedbackThread};
use crate::services::feedback_service::{FeedbackError, FeedbackService};

pub struct SeaOrmFeedbackService {
    store: Store,
}

impl SeaOrmFeedbackService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load(&self, id: FeedbackId) -> Result<Feedback, FeedbackError> {
        self.store
            .get_feedback(id)
            .await?
            .ok_or(FeedbackError::NotFound(id))
    }

    fn deny(user: &CurrentUser, action: &str, id: FeedbackId) -> FeedbackError {
        warn!(
            "User {:?} is not allowed to {} feedback {}",
            user.username(),
            action,
            id
        );
        FeedbackError::Forbidden
    }
}

#[async_trait]
impl FeedbackService for SeaOrmFeedbackService {
    async fn submit(
        &self,
        user: &CurrentUser,
        input: &FeedbackInput,
    ) -> Result<Feedback, FeedbackError> {
        if !policy::can_submit_feedback(user) {
            return Err(FeedbackError::Forbidden);
        }

        let input = input.trimmed();
        input
            .validate_submission()
            .map_err(FeedbackError::Validation)?;

        let feedback = self.store.add_feedback(user.id(), &input).await?;
        metrics::counter!("feedback_submitted_total").increment(1);

        Ok(feedback)
    }

    async fn list_own(&self, user: &CurrentUser) -> Result<Vec<FeedbackThread>, FeedbackError> {
        let Some(author) = user.id().filter(|_| policy::can_view_own_feedback_list(user)) else {
            return Err(FeedbackError::Forbidden);
        };

        let own = self.store.list_feedback_by_author(author).await?;
        Ok(self.store.attach_replies(own).await?)
    }

    async fn dashboard(
        &self,
        user: &CurrentUser,
        query: &DashboardQuery,
        now: DateTime<Local>,
    ) -> Result<Vec<FeedbackThread>, FeedbackError> {
        if !policy::can_view_admin_dashboard(user) {
            return Err(FeedbackError::Forbidden);
        }

        let all = self.store.list_all_feedback().await?;
        let matched = filter::apply(all, query, &now);

        Ok(self.store.attach_replies(matched).await?)
    }

    async fn editable(
        &self,
        user: &CurrentUser,
        id: FeedbackId,
    ) -> Result<Feedback, FeedbackError> {
        let feedback = self.load(id).await?;

        if !policy::can_edit(user, feedback.author) {
            return Err(Self::deny(user, "edit", id));
        }

        Ok(feedback)
    }

    async fn update(
        &self,
        user: &CurrentUser,
        id: FeedbackId,
        input: &FeedbackInput,
    ) -> Result<Feedback, FeedbackError> {
        self.editable(user, id).await?;

        let input = input.trimmed();
        input.validate().map_err(FeedbackError::Validation)?;

        self.store
            .update_feedback(id, &input)
            .await?
            .ok_or(FeedbackError::NotFound(id))
    }

    async fn deletable(
        &self,
        user: &CurrentUser,
        id: FeedbackId,
    ) -> Result<Feedback, FeedbackError> {
        let feedback = self.load(id).await?;

        if !policy::can_delete(user, feedback.author) {
            return Err(Self::deny(user, "delete", id));
        }

        Ok(feedback)
    }

    async fn delete(&self, user: &CurrentUser, id: FeedbackId) -> Result<(), FeedbackError> {
        self.deletable(user, id).await?;

        if !self.store.delete_feedback(id).await? {
            return Err(FeedbackError::NotFound(id));
        }

        info!("Feedback {} deleted by {:?}", id, user.username());
        Ok(())
    }

    async fn reply_thread(
        &self,
        user: &CurrentUser,
        id: FeedbackId,
    ) -> Result<FeedbackThread, FeedbackError> {
        if !policy::can_reply(user) {
            return Err(FeedbackError::Forbidden);
        }

        let feedback = self.load(id).await?;
        let replies = self.store.get_replies(id).await?;

        Ok(FeedbackThread { feedback, replies })
    }

    async fn reply(
        &self,
        user: &CurrentUser,
        id: FeedbackId,
        message: &str,
    ) -> Result<Option<FeedbackReply>, FeedbackError> {
        let Some(admin) = user.id().filter(|_| policy::can_reply(user)) else {
            return Err(FeedbackError::Forbidden);
        };

        self.load(id).await?;

        let message = message.trim();
        if message.is_empty() {
            return Ok(None);
        }

        let reply = self.store.add_reply(id, admin, message).await?;
        metrics::counter!("feedback_replies_total").increment(1);

        Ok(Some(reply))
    }
}
