use crate::config::Config;
use crate::services::AuthError;
use crate::state::SharedState;

/// Environment variable read when `--password` is not given.
pub const STAFF_PASSWORD_ENV: &str = "FEEDBACK_PORTAL_STAFF_PASSWORD";

pub async fn cmd_create_staff(
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let shared = SharedState::new(config.clone()).await?;

    match shared
        .auth_service
        .create_staff(username, email, password)
        .await
    {
        Ok(user) => {
            println!("✓ Created staff account '{}' (ID: {})", user.username, user.id);
            Ok(())
        }
        Err(AuthError::InvalidRegistration(errors)) => {
            anyhow::bail!("Could not create staff account: {}", errors.join("; "))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> Config {
        let db_path =
            std::env::temp_dir().join(format!("feedback-portal-cli-{}.db", uuid::Uuid::new_v4()));

        let mut config = Config::default();
        config.general.database_path = format!("sqlite:{}", db_path.display());
        config.security.argon2_memory_cost_kib = 1024;
        config.security.argon2_time_cost = 1;
        config
    }

    #[tokio::test]
    async fn create_staff_succeeds_once() {
        let config = temp_config();

        cmd_create_staff(&config, "admin", "admin@example.com", "S3cure-pass!")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_staff_account_is_an_error() {
        let config = temp_config();
        cmd_create_staff(&config, "admin", "admin@example.com", "S3cure-pass!")
            .await
            .unwrap();

        let err = cmd_create_staff(&config, "admin", "other@example.com", "S3cure-pass!")
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Could not create staff account:"));
        assert!(message.contains("A user with that username already exists."));
    }
}
