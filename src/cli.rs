//! Command line interface
//!
//! Without a subcommand the terminal UI opens on the request file. The
//! subcommands work on the same file without starting the UI.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::style::{Color, Stylize};

use crate::constants::{DEFAULT_FILE_NAME, USER_AGENT};
use crate::models::{method_has_body, RequestEntry, Response};
use crate::network::client::{create_client, send, PreparedRequest};
use crate::storage;
use crate::ui;

#[derive(Debug, Parser)]
#[command(name = "postbear", version, about = "Compose and fire HTTP requests kept in a .http file")]
pub struct Cli {
    /// Request file to open; `.http` is appended when missing
    #[arg(short, long, global = true, default_value = DEFAULT_FILE_NAME)]
    pub file: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the requests stored in the file
    List {
        /// Print the parsed collection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send a one-off request
    Send {
        method: String,
        url: String,
        /// Body for POST, PUT and PATCH
        payload: Option<String>,
        /// Print only the response body
        #[arg(short, long)]
        simple: bool,
    },
    /// Send a request from the file by name, with global variables applied
    Run {
        name: String,
        #[arg(short, long)]
        simple: bool,
    },
}

/// Execute a subcommand
pub async fn run(file: &Path, command: Command) -> Result<()> {
    match command {
        Command::List { json } => list(file, json),
        Command::Send {
            method,
            url,
            payload,
            simple,
        } => send_one_off(&method, &url, payload, simple).await,
        Command::Run { name, simple } => run_named(file, &name, simple).await,
    }
}

fn list(file: &Path, json: bool) -> Result<()> {
    let collection = storage::load(file)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&collection)?);
        return Ok(());
    }

    if collection.requests.is_empty() {
        println!("No requests in {}", file.display());
        return Ok(());
    }
    for (i, request) in collection.requests.iter().enumerate() {
        println!(
            "{:>3}. {} {} {}",
            i + 1,
            format!("{:<7}", request.method).with(method_color(&request.method)).bold(),
            request.name.as_str().bold(),
            request.url.as_str().dark_grey()
        );
    }
    Ok(())
}

/// Build the entry a one-off `send` fires
fn one_off_entry(method: &str, url: &str, payload: Option<String>) -> RequestEntry {
    let mut entry = RequestEntry::new("one-off", method.to_ascii_uppercase(), url);
    let mut headers = vec![("User-Agent".to_string(), USER_AGENT.to_string())];
    if method_has_body(method) {
        if let Some(payload) = payload {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
            entry.body = payload;
        }
    }
    entry.headers = crate::httpfile::headers::encode_pairs(&headers);
    entry
}

async fn send_one_off(method: &str, url: &str, payload: Option<String>, simple: bool) -> Result<()> {
    let entry = one_off_entry(method, url, payload);
    fire(&entry, &BTreeMap::new(), simple).await
}

async fn run_named(file: &Path, name: &str, simple: bool) -> Result<()> {
    let collection = storage::load(file)?;
    let entry = collection
        .find(name)
        .ok_or_else(|| anyhow!("no request named {:?} in {}", name, file.display()))?;
    fire(entry, &collection.global_vars, simple).await
}

async fn fire(entry: &RequestEntry, vars: &BTreeMap<String, String>, simple: bool) -> Result<()> {
    let missing = entry.unresolved_vars(vars);
    if !missing.is_empty() {
        tracing::warn!(?missing, "Sending with unresolved variables");
        eprintln!(
            "{} {}",
            "warning:".with(Color::Yellow).bold(),
            format!("unresolved variables: {}", missing.join(", "))
        );
    }
    let prepared = PreparedRequest::from_entry(entry, vars)?;
    let method = prepared.method.to_string();
    let url = prepared.url.clone();

    tracing::info!(%method, %url, "Sending request from the command line");
    let response = send(&create_client(), prepared)
        .await
        .with_context(|| format!("{} {} failed", method, url))?;

    if simple {
        println!("{}", response.body);
    } else {
        print_response(&method, &url, &response);
    }
    Ok(())
}

fn method_color(method: &str) -> Color {
    ui::method_color(method).into()
}

fn status_color(code: u16) -> Color {
    ui::status_color(code).into()
}

fn print_response(method: &str, url: &str, response: &Response) {
    let code = response.status_code.unwrap_or_default();
    let label = |text: &str| text.to_string().with(Color::Cyan).bold();

    println!(
        "{} {}",
        format!(" {} ", method).on(method_color(method)).black().bold(),
        format!(" {} ", url).with(Color::Magenta)
    );
    println!(
        "{}",
        format!("{} {}", code, response.status_text).with(status_color(code)).bold()
    );
    println!("{} {}", label("StatusCode:"), code);
    println!("{} {}", label("Protocol:"), response.version);
    println!(
        "{} {}",
        label("ContentLength:"),
        response
            .content_length
            .map(|n| n.to_string())
            .unwrap_or_else(|| String::from("-1"))
    );
    println!("{} {}ms", label("Response Time:"), response.time_ms);
    println!("{}", "Headers:".with(Color::Magenta).bold());
    for (key, value) in &response.headers {
        println!("  {} {}", label(&format!("{}:", key)), value);
    }
    println!("{}", "Response:".with(Color::Magenta).bold());
    println!("{}", response.body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::httpfile::headers::decode_headers;

    #[test]
    fn test_cli_defaults_to_ui() {
        let cli = Cli::try_parse_from(["postbear"]).unwrap();
        assert_eq!(cli.file, "postbear.http");
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_send_arguments() {
        let cli = Cli::try_parse_from(["postbear", "-f", "api", "send", "POST", "http://x.test", "{}", "-s"])
            .unwrap();
        assert_eq!(cli.file, "api");
        match cli.command {
            Some(Command::Send {
                method,
                url,
                payload,
                simple,
            }) => {
                assert_eq!(method, "POST");
                assert_eq!(url, "http://x.test");
                assert_eq!(payload.as_deref(), Some("{}"));
                assert!(simple);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_terminal_colors_follow_ui_palette() {
        // ratatui's base colours are crossterm's dark variants
        assert_eq!(method_color("delete"), Color::DarkRed);
        assert_eq!(method_color("GET"), Color::DarkGreen);
        assert_eq!(status_color(201), Color::DarkGreen);
        assert_eq!(status_color(500), Color::DarkMagenta);
    }

    #[test]
    fn test_one_off_entry_headers() {
        let entry = one_off_entry("post", "http://x.test", Some("{\"a\":1}".to_string()));
        assert_eq!(entry.method, "POST");
        assert_eq!(entry.body, "{\"a\":1}");
        let headers = decode_headers(&entry.headers).unwrap();
        assert!(headers.contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(headers.iter().any(|(k, _)| k == "User-Agent"));
    }

    #[test]
    fn test_one_off_get_ignores_payload() {
        let entry = one_off_entry("GET", "http://x.test", Some("ignored".to_string()));
        assert!(entry.body.is_empty());
        let headers = decode_headers(&entry.headers).unwrap();
        assert_eq!(headers.len(), 1);
    }
}
