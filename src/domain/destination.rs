//! Redirect destinations.
//!
//! Callers may name a destination either by its route name (`my_feedback`)
//! or by a local path (`/dashboard?q=x`). Anything else resolves to `None`
//! and the caller falls back to the role default.

use super::CurrentUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Homepage,
    Login,
    Register,
    FeedbackForm,
    AdminDashboard,
    MyFeedback,
    /// A validated same-site path.
    Local(String),
}

impl Destination {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Homepage => "/",
            Self::Login => "/login/",
            Self::Register => "/register/",
            Self::FeedbackForm => "/feedback_form",
            Self::AdminDashboard => "/dashboard",
            Self::MyFeedback => "/my/feedback/",
            Self::Local(path) => path,
        }
    }

    /// Token that round-trips through [`Destination::resolve`].
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Homepage => "homepage",
            Self::Login => "login",
            Self::Register => "register",
            Self::FeedbackForm => "feedback_form",
            Self::AdminDashboard => "admin_dashboard",
            Self::MyFeedback => "my_feedback",
            Self::Local(path) => path,
        }
    }

    #[must_use]
    pub fn resolve(token: &str) -> Option<Self> {
        let token = token.trim();
        match token {
            "homepage" => Some(Self::Homepage),
            "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            "feedback_form" => Some(Self::FeedbackForm),
            "admin_dashboard" => Some(Self::AdminDashboard),
            "my_feedback" => Some(Self::MyFeedback),
            path if is_safe_local_path(path) => Some(Self::Local(path.to_string())),
            _ => None,
        }
    }

    /// Where an unauthorized or finished delete sends the user.
    #[must_use]
    pub const fn default_after_delete(user: &CurrentUser) -> Self {
        if user.is_staff() {
            Self::AdminDashboard
        } else {
            Self::MyFeedback
        }
    }

    /// Resolves the first present token, falling back to `fallback`.
    #[must_use]
    pub fn resolve_or(tokens: &[Option<&str>], fallback: Self) -> Self {
        tokens
            .iter()
            .flatten()
            .find(|token| !token.trim().is_empty())
            .and_then(|token| Self::resolve(token))
            .unwrap_or(fallback)
    }
}

fn is_safe_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}
