//! Domain types for the feedback portal.
//!
//! This module holds the identifiers, the request-scoped user identity and the
//! pure decision logic (authorization policy, dashboard filter, redirect
//! destinations) that every handler consumes. Nothing in here touches the
//! database or the HTTP layer.

pub mod destination;
pub mod filter;
pub mod policy;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use destination::Destination;
pub use filter::{DashboardQuery, DateScope};

/// Unique identifier for a registered user.
///
/// Newtype wrapper so user ids cannot be confused with feedback ids.
///
/// # Examples
///
/// ```rust
/// use feedback_portal::domain::UserId;
///
/// let id = UserId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Unique identifier for a feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(i32);

impl FeedbackId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for FeedbackId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<FeedbackId> for i32 {
    fn from(id: FeedbackId) -> Self {
        id.0
    }
}

/// The authenticated account behind a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl SessionUser {
    /// Superusers count as staff everywhere staff privileges are checked.
    #[must_use]
    pub const fn has_staff_privileges(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Identity resolved for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CurrentUser {
    #[default]
    Anonymous,
    Authenticated(SessionUser),
}

impl CurrentUser {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn is_staff(&self) -> bool {
        match self {
            Self::Anonymous => false,
            Self::Authenticated(user) => user.has_staff_privileges(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user.id),
        }
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(&user.username),
        }
    }

    /// Where a user lands when no explicit destination applies.
    #[must_use]
    pub const fn home(&self) -> Destination {
        if self.is_staff() {
            Destination::AdminDashboard
        } else {
            Destination::Homepage
        }
    }
}
