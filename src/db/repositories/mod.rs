pub mod feedback;
pub mod reply;
pub mod user;
