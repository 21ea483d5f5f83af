pub use super::feedback::Entity as Feedback;
pub use super::feedback_replies::Entity as FeedbackReplies;
pub use super::users::Entity as Users;
