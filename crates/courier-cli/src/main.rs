mod args;
mod config;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::debug;

use courier_app::AppError;
use courier_db::Database;

use args::{Cli, Command, MessagesAction, MessagesArgs, UsersAction, UsersArgs};
use output::Format;

fn main() -> anyhow::Result<ExitCode> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout is for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = Format::from_flag(cli.json);

    let config = config::db_config(&cli.db)?;
    // Held for the whole command and closed on drop, whatever the outcome.
    let db = Database::open(&config)
        .with_context(|| format!("opening database {}", cli.db.display()))?;
    debug!("Using database {}", cli.db.display());

    let result = match &cli.command {
        Command::Users(args) => run_users(&db, args, format),
        Command::Messages(args) => run_messages(&db, args, format),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(Failure::App(e)) => {
            eprintln!("{}", describe(&e));
            Ok(ExitCode::FAILURE)
        }
        Err(Failure::Other(e)) => Err(e),
    }
}

/// Errors the user caused are reported plainly; anything else bubbles up to
/// `main` with its context chain.
enum Failure {
    App(AppError),
    Other(anyhow::Error),
}

impl From<AppError> for Failure {
    fn from(e: AppError) -> Self {
        Failure::App(e)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(e: anyhow::Error) -> Self {
        Failure::Other(e)
    }
}

fn run_users(db: &Database, args: &UsersArgs, format: Format) -> Result<(), Failure> {
    match args.action() {
        UsersAction::Edit {
            username,
            password,
            new_pass,
        } => {
            courier_app::edit_user(db, username, password, new_pass)?;
            output::status(format, "Password has been changed.")?;
        }
        UsersAction::Delete { username, password } => {
            courier_app::delete_user(db, username, password)?;
            output::status(format, "User successfully deleted!")?;
        }
        UsersAction::Create { username, password } => {
            courier_app::create_user(db, username, password)?;
            output::status(format, "User created successfully!")?;
        }
        UsersAction::List => {
            let users = courier_app::list_users(db)?;
            output::users(format, &users)?;
        }
        UsersAction::Help => print_help("users")?,
    }
    Ok(())
}

fn run_messages(db: &Database, args: &MessagesArgs, format: Format) -> Result<(), Failure> {
    let (Some(username), Some(password)) = (args.username.as_deref(), args.password.as_deref())
    else {
        eprintln!("username and password are required");
        print_help("messages")?;
        return Ok(());
    };

    // Credentials are checked before looking at what was asked for.
    let user = courier_app::authenticate(db, username, password)?;

    match args.action() {
        MessagesAction::List => {
            let inbox = courier_app::list_messages(db, &user)?;
            output::inbox(format, &inbox)?;
        }
        MessagesAction::Send { to, text } => {
            courier_app::send_message(db, &user, to, text)?;
            output::status(format, "Message sent successfully!")?;
        }
        MessagesAction::Help => print_help("messages")?,
    }
    Ok(())
}

fn print_help(subcommand: &str) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    match cmd.find_subcommand_mut(subcommand) {
        Some(sub) => sub.print_help()?,
        None => cmd.print_help()?,
    }
    Ok(())
}

fn describe(e: &AppError) -> String {
    match e {
        AppError::NotFound(what) => format!("{} does not exist!", capitalize(what)),
        AppError::DuplicateUser(name) => format!("User {} already exists!", name),
        AppError::Validation(msg) => capitalize(msg),
        AppError::AuthenticationFailed => "Incorrect password or user does not exist!".to_string(),
        AppError::Store(e) => format!("Database error: {}", e),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
