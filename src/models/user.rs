use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{SessionUser, UserId};
use crate::models::validation::{is_valid_email, is_valid_username};

pub const MAX_USERNAME_LENGTH: usize = 150;

/// Account data without the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

/// Fields of the registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl Registration {
    /// Returns every field-level problem; the email uniqueness check needs the
    /// store and happens in the auth service.
    #[must_use]
    pub fn field_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() {
            errors.push("Username is required".to_string());
        } else if username.chars().count() > MAX_USERNAME_LENGTH {
            errors.push(format!(
                "Username must be {MAX_USERNAME_LENGTH} characters or less"
            ));
        } else if !is_valid_username(username) {
            errors.push(
                "Username may contain only letters, numbers, and @/./+/-/_ characters".to_string(),
            );
        }

        if email.is_empty() {
            errors.push("Email is required".to_string());
        } else if !is_valid_email(email) {
            errors.push("Enter a valid email address".to_string());
        }

        if self.password.is_empty() {
            errors.push("Password is required".to_string());
        }

        if self.password != self.confirm_password {
            errors.push("Passwords do not match".to_string());
        }

        errors
    }
}
