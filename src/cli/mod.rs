//! Command-line interface for the feedback portal.

mod commands;

use clap::{Parser, Subcommand};

/// Feedback Portal - collect and answer user feedback
#[derive(Parser)]
#[command(name = "feedback-portal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create a staff account with full dashboard access
    CreateStaff {
        /// Login name
        username: String,
        /// Contact e-mail
        email: String,
        /// Password for the new account
        #[arg(long, env = commands::STAFF_PASSWORD_ENV, hide_env_values = true)]
        password: String,
    },
}

pub use commands::*;
