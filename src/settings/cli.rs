use super::Parser;
use clap::{Args, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "travelx", about = "Browse destinations, book trips and manage your account")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the issued tokens
    Login(Credentials),
    /// Create an account, then sign in with it
    Register {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long)]
        confirm_password: String,
    },
    /// Sign out and forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Save a display theme on the profile
    Theme {
        /// light, dark or default; toggles when omitted
        theme: Option<String>,
    },
    Roles,
    Destinations {
        #[arg(long, conflicts_with = "search")]
        id: Option<String>,
        /// Match title, country or city, ignoring case
        #[arg(long)]
        search: Option<String>,
    },
    Bookings {
        #[arg(long)]
        cancel: Option<String>,
    },
    /// Book a five day trip
    Book {
        #[arg(long)]
        destination: String,
        /// Travel date, YYYY-MM-DD
        #[arg(long)]
        date: chrono::NaiveDate,
        #[arg(long, default_value_t = 2)]
        travelers: u32,
        /// Pay right away through this provider
        #[arg(long)]
        pay: Option<String>,
        #[arg(long)]
        currency: Option<String>,
    },
    Reviews {
        #[arg(long)]
        destination: String,
    },
    Review {
        #[arg(long)]
        destination: String,
        #[arg(long)]
        rating: u8,
        #[arg(long, default_value = "")]
        comment: String,
        /// Id of an existing review to edit
        #[arg(long)]
        edit: Option<String>,
    },
    Payments,
}

#[derive(Args, Debug)]
pub struct Credentials {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
}
