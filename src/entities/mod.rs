pub mod prelude;

pub mod feedback;
pub mod feedback_replies;
pub mod users;
