use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{FeedbackId, UserId};
use crate::models::validation::is_valid_email;

pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub author: Option<UserId>,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackReply {
    pub id: i32,
    pub feedback: FeedbackId,
    pub admin: Option<UserId>,
    /// Username of the replying admin, if the account still exists.
    pub admin_name: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A feedback record together with its replies, oldest reply first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackThread {
    pub feedback: Feedback,
    pub replies: Vec<FeedbackReply>,
}

/// Submitted `name`/`email`/`message` fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl FeedbackInput {
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// Rules applied to new submissions: non-empty message, bounded name.
    /// Expects trimmed input.
    pub fn validate_submission(&self) -> Result<(), String> {
        if self.message.is_empty() {
            return Err("Message cannot be empty".to_string());
        }

        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(format!(
                "Name must be {MAX_NAME_LENGTH} characters or less"
            ));
        }

        Ok(())
    }

    /// Edit-form rules: the submission rules plus a well-formed email when
    /// one is given. Expects trimmed input.
    pub fn validate(&self) -> Result<(), String> {
        self.validate_submission()?;

        if !self.email.is_empty() && !is_valid_email(&self.email) {
            return Err("Enter a valid email address".to_string());
        }

        Ok(())
    }
}

impl From<&Feedback> for FeedbackInput {
    fn from(feedback: &Feedback) -> Self {
        Self {
            name: feedback.name.clone(),
            email: feedback.email.clone(),
            message: feedback.message.clone(),
        }
    }
}
