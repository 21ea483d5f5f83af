//! Domain service for registration, login and session identity.

use thiserror::Error;

use crate::domain::UserId;
use crate::models::user::{Registration, User};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// One user-facing message per rejected field.
    #[error("Registration rejected: {}", .0.join("; "))]
    InvalidRegistration(Vec<String>),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a regular (non-staff) account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidRegistration`] when a field is invalid, the
    /// passwords differ, or the username or e-mail (case-insensitively) is
    /// already taken.
    async fn register(&self, form: &Registration) -> Result<User, AuthError>;

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Resolves the account stored in a session, if it still exists.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, AuthError>;

    /// Creates a staff superuser account.
    async fn create_staff(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError>;
}
