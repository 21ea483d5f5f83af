pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod feedback_service;
pub use feedback_service::{FeedbackError, FeedbackService};

pub mod feedback_service_impl;
pub use feedback_service_impl::SeaOrmFeedbackService;
