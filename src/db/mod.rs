use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{FeedbackId, UserId};
use crate::models::feedback::{Feedback, FeedbackInput, FeedbackReply, FeedbackThread};
use crate::models::user::User;

pub mod migrator;
pub mod repositories;

pub use repositories::user::NewUser;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn feedback_repo(&self) -> repositories::feedback::FeedbackRepository {
        repositories::feedback::FeedbackRepository::new(self.conn.clone())
    }

    fn reply_repo(&self) -> repositories::reply::ReplyRepository {
        repositories::reply::ReplyRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(&self, user: NewUser<'_>, security: &SecurityConfig) -> Result<User> {
        self.user_repo().create(user, security).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        self.user_repo().username_exists(username).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists_ignore_case(email).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    // ========================================================================
    // Feedback
    // ========================================================================

    pub async fn add_feedback(&self, author: Option<UserId>, input: &FeedbackInput) -> Result<Feedback> {
        self.feedback_repo().add(author, input).await
    }

    pub async fn get_feedback(&self, id: FeedbackId) -> Result<Option<Feedback>> {
        self.feedback_repo().get(id).await
    }

    pub async fn list_all_feedback(&self) -> Result<Vec<Feedback>> {
        self.feedback_repo().list_all().await
    }

    pub async fn list_feedback_by_author(&self, author: UserId) -> Result<Vec<Feedback>> {
        self.feedback_repo().list_by_author(author).await
    }

    pub async fn update_feedback(&self, id: FeedbackId, input: &FeedbackInput) -> Result<Option<Feedback>> {
        self.feedback_repo().update(id, input).await
    }

    pub async fn delete_feedback(&self, id: FeedbackId) -> Result<bool> {
        self.feedback_repo().remove(id).await
    }

    pub async fn feedback_count(&self) -> Result<u64> {
        self.feedback_repo().count().await
    }

    // ========================================================================
    // Replies
    // ========================================================================

    pub async fn add_reply(
        &self,
        feedback: FeedbackId,
        admin: UserId,
        message: &str,
    ) -> Result<FeedbackReply> {
        self.reply_repo().add(feedback, admin, message).await
    }

    pub async fn get_replies(&self, feedback: FeedbackId) -> Result<Vec<FeedbackReply>> {
        self.reply_repo().list_for_feedback(feedback).await
    }

    pub async fn reply_count(&self, feedback: FeedbackId) -> Result<u64> {
        self.reply_repo().count_for_feedback(feedback).await
    }

    /// Pairs each feedback with its replies, preserving the input order.
    pub async fn attach_replies(&self, feedback: Vec<Feedback>) -> Result<Vec<FeedbackThread>> {
        let ids: Vec<FeedbackId> = feedback.iter().map(|f| f.id).collect();
        let mut replies = self.reply_repo().list_for_feedback_ids(&ids).await?;

        Ok(feedback
            .into_iter()
            .map(|feedback| FeedbackThread {
                replies: replies.remove(&feedback.id).unwrap_or_default(),
                feedback,
            })
            .collect())
    }
}
