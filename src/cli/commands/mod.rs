mod init;
mod serve;
mod staff;

pub use init::cmd_init;
pub use serve::cmd_serve;
pub use staff::{STAFF_PASSWORD_ENV, cmd_create_staff};
