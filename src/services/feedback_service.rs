//! Domain service for feedback records and staff replies.
//!
//! Every operation takes the acting [`CurrentUser`] and applies the
//! authorization policy before touching the store, so handlers never decide
//! ownership themselves.

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::domain::{CurrentUser, DashboardQuery, FeedbackId};
use crate::models::feedback::{Feedback, FeedbackInput, FeedbackReply, FeedbackThread};

/// Errors specific to feedback operations.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Feedback not found: {0}")]
    NotFound(FeedbackId),

    /// The policy denied the operation; callers redirect instead of failing.
    #[error("Not allowed")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for FeedbackError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for feedback.
#[async_trait::async_trait]
pub trait FeedbackService: Send + Sync {
    /// Stores trimmed feedback authored by `user`.
    ///
    /// Not idempotent: every valid call creates a new row.
    ///
    /// # Errors
    ///
    /// [`FeedbackError::Validation`] when the trimmed message is empty.
    async fn submit(&self, user: &CurrentUser, input: &FeedbackInput)
    -> Result<Feedback, FeedbackError>;

    /// Feedback authored by `user`, newest first, with replies.
    async fn list_own(&self, user: &CurrentUser) -> Result<Vec<FeedbackThread>, FeedbackError>;

    /// Staff dashboard: all feedback filtered by `query` relative to `now`.
    async fn dashboard(
        &self,
        user: &CurrentUser,
        query: &DashboardQuery,
        now: DateTime<Local>,
    ) -> Result<Vec<FeedbackThread>, FeedbackError>;

    /// Loads feedback the user may edit.
    async fn editable(&self, user: &CurrentUser, id: FeedbackId)
    -> Result<Feedback, FeedbackError>;

    /// Updates name/email/message in place; `created_at` is unchanged.
    async fn update(
        &self,
        user: &CurrentUser,
        id: FeedbackId,
        input: &FeedbackInput,
    ) -> Result<Feedback, FeedbackError>;

    /// Loads feedback the user may delete.
    async fn deletable(&self, user: &CurrentUser, id: FeedbackId)
    -> Result<Feedback, FeedbackError>;

    /// Deletes the feedback together with its replies.
    async fn delete(&self, user: &CurrentUser, id: FeedbackId) -> Result<(), FeedbackError>;

    /// Loads a feedback thread for the staff reply page.
    async fn reply_thread(
        &self,
        user: &CurrentUser,
        id: FeedbackId,
    ) -> Result<FeedbackThread, FeedbackError>;

    /// Posts a staff reply. An empty (trimmed) message creates nothing and
    /// yields `Ok(None)`.
    async fn reply(
        &self,
        user: &CurrentUser,
        id: FeedbackId,
        message: &str,
    ) -> Result<Option<FeedbackReply>, FeedbackError>;
}
