pub mod feedback;
pub mod user;
pub mod validation;
