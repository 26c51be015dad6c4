//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Courier: register users and exchange short messages.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "COURIER_DB_PATH", default_value = "courier.db")]
    pub db: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, edit, delete or list users
    Users(UsersArgs),
    /// Read or send messages
    Messages(MessagesArgs),
}

#[derive(Args, Debug)]
pub struct UsersArgs {
    /// Username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password (min 8 characters)
    #[arg(short, long)]
    pub password: Option<String>,

    /// New password (min 8 characters)
    #[arg(short, long = "new-pass")]
    pub new_pass: Option<String>,

    /// List all users
    #[arg(short, long)]
    pub list: bool,

    /// Delete the user
    #[arg(short, long)]
    pub delete: bool,

    /// Change the user's password
    #[arg(short, long)]
    pub edit: bool,
}

#[derive(Args, Debug)]
pub struct MessagesArgs {
    /// Username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password
    #[arg(short, long)]
    pub password: Option<String>,

    /// List received messages
    #[arg(short, long)]
    pub list: bool,

    /// Recipient's username
    #[arg(short, long)]
    pub to: Option<String>,

    /// Text to send (max 255 characters)
    #[arg(short, long)]
    pub send: Option<String>,
}

/// What `courier users` should do, decided from the flags given.
#[derive(Debug, PartialEq, Eq)]
pub enum UsersAction<'a> {
    Edit {
        username: &'a str,
        password: &'a str,
        new_pass: &'a str,
    },
    Delete {
        username: &'a str,
        password: &'a str,
    },
    Create {
        username: &'a str,
        password: &'a str,
    },
    List,
    Help,
}

impl UsersArgs {
    pub fn action(&self) -> UsersAction<'_> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => match self.new_pass.as_deref() {
                Some(new_pass) if self.edit => UsersAction::Edit {
                    username,
                    password,
                    new_pass,
                },
                _ if self.delete => UsersAction::Delete { username, password },
                _ => UsersAction::Create { username, password },
            },
            _ if self.list => UsersAction::List,
            _ => UsersAction::Help,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MessagesAction<'a> {
    List,
    Send { to: &'a str, text: &'a str },
    Help,
}

impl MessagesArgs {
    /// Credentials are checked separately; this only picks the operation.
    pub fn action(&self) -> MessagesAction<'_> {
        match (self.to.as_deref(), self.send.as_deref()) {
            _ if self.list => MessagesAction::List,
            (Some(to), Some(text)) => MessagesAction::Send { to, text },
            _ => MessagesAction::Help,
        }
    }
}
