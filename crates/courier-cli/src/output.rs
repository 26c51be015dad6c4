//! Rendering of command results on stdout.

use anyhow::Result;
use courier_types::{InboxEntry, User};
use serde::Serialize;

const SEPARATOR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_flag(json: bool) -> Self {
        if json { Format::Json } else { Format::Text }
    }
}

/// A one-line outcome such as "User created successfully!".
pub fn status(format: Format, message: &str) -> Result<()> {
    match format {
        Format::Text => println!("{}", message),
        Format::Json => print_json(&serde_json::json!({ "status": message }))?,
    }
    Ok(())
}

pub fn users(format: Format, users: &[User]) -> Result<()> {
    match format {
        Format::Text => {
            for user in users {
                println!("{}", user.username);
            }
        }
        Format::Json => print_json(&users)?,
    }
    Ok(())
}

pub fn inbox(format: Format, entries: &[InboxEntry]) -> Result<()> {
    match format {
        Format::Text => print!("{}", render_inbox(entries)),
        Format::Json => print_json(&entries)?,
    }
    Ok(())
}

fn render_inbox(entries: &[InboxEntry]) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{sep}\nfrom: {}\ndata: {}\n{}\n{sep}\n",
            entry.from_username,
            entry.message.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.message.text,
            sep = separator,
        ));
    }
    out
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
