//! One-shot messages carried in the session until the next rendered page.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash flash-success",
            Self::Error => "flash flash-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

pub async fn push(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    pending.push(flash);
    session.insert(FLASH_KEY, pending).await
}

/// Removes and returns every pending message.
pub async fn drain(session: &Session) -> Result<Vec<Flash>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Flash>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}
