//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{NewUser, Store};
use crate::domain::UserId;
use crate::models::user::{Registration, User};
use crate::services::auth_service::{AuthError, AuthService};

const USERNAME_TAKEN: &str = "A user with that username already exists.";

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn check_uniqueness(&self, username: &str, email: &str) -> Result<Vec<String>, AuthError> {
        let mut errors = Vec::new();

        if self.store.username_exists(username).await? {
            errors.push(USERNAME_TAKEN.to_string());
        }

        if self.store.email_exists(email).await? {
            errors.push("A user with that email already exists.".to_string());
        }

        Ok(errors)
    }

    /// Inserts the account. A concurrent registration that wins the race on
    /// the username is reported like any other taken username.
    async fn insert_user(&self, user: NewUser<'_>) -> Result<User, AuthError> {
        let username = user.username;

        match self.store.create_user(user, &self.security).await {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => {
                warn!("Username '{}' was taken concurrently", username);
                Err(AuthError::InvalidRegistration(vec![USERNAME_TAKEN.to_string()]))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<DbErr>())
        .any(|db_err| matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))))
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, form: &Registration) -> Result<User, AuthError> {
        let username = form.username.trim();
        let email = form.email.trim();

        let mut errors = form.field_errors();
        if !username.is_empty() && !email.is_empty() {
            errors.extend(self.check_uniqueness(username, email).await?);
        }

        if !errors.is_empty() {
            info!("Registration for '{}' rejected: {}", username, errors.join("; "));
            return Err(AuthError::InvalidRegistration(errors));
        }

        self.insert_user(NewUser {
            username,
            email,
            password: &form.password,
            is_staff: false,
            is_superuser: false,
        })
        .await
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        match self.store.verify_user_password(username, password).await? {
            Some(user) => Ok(user),
            None => {
                warn!("Failed login attempt for '{}'", username);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(id).await?)
    }

    async fn create_staff(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let form = Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
        };

        let mut errors = form.field_errors();
        errors.extend(self.check_uniqueness(username.trim(), email.trim()).await?);
        if !errors.is_empty() {
            return Err(AuthError::InvalidRegistration(errors));
        }

        self.insert_user(NewUser {
            username: username.trim(),
            email: email.trim(),
            password,
            is_staff: true,
            is_superuser: true,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> SeaOrmAuthService {
        let db_path =
            std::env::temp_dir().join(format!("feedback-portal-auth-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap();
        let security = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };
        SeaOrmAuthService::new(store, security)
    }

    fn new_user<'a>(username: &'a str, email: &'a str) -> NewUser<'a> {
        NewUser {
            username,
            email,
            password: "pw",
            is_staff: false,
            is_superuser: false,
        }
    }

    #[tokio::test]
    async fn username_lost_to_a_concurrent_insert_is_a_form_error() {
        let service = service().await;
        service
            .insert_user(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        // Same username past the uniqueness check: only the constraint catches it.
        let err = service
            .insert_user(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();

        match err {
            AuthError::InvalidRegistration(errors) => assert_eq!(errors, vec![USERNAME_TAKEN]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_reports_taken_username() {
        let service = service().await;
        let form = Registration {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        };
        service.register(&form).await.unwrap();

        let again = Registration {
            email: "second@example.com".to_string(),
            ..form
        };
        assert!(matches!(
            service.register(&again).await,
            Err(AuthError::InvalidRegistration(_))
        ));
    }

    #[test]
    fn other_errors_are_not_unique_violations() {
        let err = anyhow::anyhow!("disk full");
        assert!(!is_unique_violation(&err));
    }
}
