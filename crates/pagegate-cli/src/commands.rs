use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use pagegate_core::{Config, FileStorage, Navigator, Portal};

pub const USAGE: &str = "\
Usage: pagegate <command>

Commands:
  login [--username NAME]   Log in (password is prompted without echo)
  status                    Show the current session
  open <page>               Visit a protected page
  logout                    End the session
  config                    Show the effective configuration";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: Option<String> },
    Status,
    Open { page: String },
    Logout,
    Config,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let (name, rest) = args.split_first().ok_or_else(|| anyhow!("Missing command"))?;
        match (name.as_str(), rest) {
            ("login", []) => Ok(Command::Login { username: None }),
            ("login", [flag, username]) if flag == "--username" || flag == "-u" => Ok(Command::Login {
                username: Some(username.clone()),
            }),
            ("status", []) => Ok(Command::Status),
            ("open", [page]) => Ok(Command::Open { page: page.clone() }),
            ("logout", []) => Ok(Command::Logout),
            ("config", []) => Ok(Command::Config),
            _ => Err(anyhow!("Unrecognised arguments: {}", args.join(" "))),
        }
    }

    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let storage = Arc::new(FileStorage::new(config.data_dir()?));

        if self == Command::Config {
            println!("config file: {}", Config::config_path()?.display());
            println!("storage file: {}", storage.path().display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }

        let portal = Portal::from_config(&config, storage, Arc::new(TerminalNavigator))?;

        match self {
            Command::Login { username } => {
                let username = match username {
                    Some(u) => u,
                    None => prompt("Username: ")?,
                };
                let password = rpassword::prompt_password("Password: ")
                    .context("Failed to read password")?;

                if portal.login(&username, &password).await? {
                    println!("Welcome, {}.", username);
                } else {
                    println!("Access denied.");
                }
            }
            Command::Status => println!("{}", status_line(&portal, Utc::now())),
            Command::Open { page } => {
                if let Some(session) = portal.require_auth() {
                    println!("{} (signed in as {})", page, session.username);
                }
            }
            Command::Logout => portal.logout()?,
            Command::Config => {}
        }
        Ok(())
    }
}

/// Prints the redirect a browser would follow.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, target: &str) {
        println!("-> {}", target);
    }
}

/// Describe the session. A record that `read` is about to purge is still
/// reported, so the visitor learns it expired rather than never existed.
fn status_line(portal: &Portal, now: DateTime<Utc>) -> String {
    let stored = portal.store().peek();
    match (portal.session(), stored) {
        (Some(session), _) => format!(
            "Logged in as {} since {} ({} minutes left)",
            session.username,
            session.login_time.to_rfc3339(),
            session.minutes_until_expiry_at(now)
        ),
        (None, Some(stale)) => format!(
            "Session for {} expired at {}. Please log in again.",
            stale.username,
            stale.expires_at().to_rfc3339()
        ),
        (None, None) => "Not logged in.".to_string(),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use pagegate_core::auth::StaticListVerifier;
    use pagegate_core::{MemoryStorage, SessionStore, Storage};

    fn portal() -> Portal {
        let storage = Arc::new(MemoryStorage::new());
        Portal::new(
            Arc::new(StaticListVerifier::default()),
            SessionStore::new(storage),
            Arc::new(TerminalNavigator),
            "login.html",
        )
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&args(&["login"])).unwrap(), Command::Login { username: None });
        assert_eq!(
            Command::parse(&args(&["login", "--username", "admin"])).unwrap(),
            Command::Login { username: Some("admin".to_string()) }
        );
        assert_eq!(Command::parse(&args(&["status"])).unwrap(), Command::Status);
        assert_eq!(
            Command::parse(&args(&["open", "members.html"])).unwrap(),
            Command::Open { page: "members.html".to_string() }
        );
        assert_eq!(Command::parse(&args(&["logout"])).unwrap(), Command::Logout);
        assert_eq!(Command::parse(&args(&["config"])).unwrap(), Command::Config);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse(&[]).is_err());
        assert!(Command::parse(&args(&["open"])).is_err());
        assert!(Command::parse(&args(&["login", "--password", "x"])).is_err());
        assert!(Command::parse(&args(&["dance"])).is_err());
    }

    #[test]
    fn test_status_logged_out() {
        assert_eq!(status_line(&portal(), Utc::now()), "Not logged in.");
    }

    #[test]
    fn test_status_active_session() {
        let portal = portal();
        portal.store().create("admin").unwrap();
        let line = status_line(&portal, Utc::now());
        assert!(line.starts_with("Logged in as admin since "), "{}", line);
    }

    #[test]
    fn test_status_reports_expired_then_purges() {
        let portal = portal();
        portal
            .store()
            .create_at("admin", Utc::now() - Duration::hours(30))
            .unwrap();

        let line = status_line(&portal, Utc::now());
        assert!(line.starts_with("Session for admin expired at "), "{}", line);
        assert!(portal.store().peek().is_none());
        assert_eq!(status_line(&portal, Utc::now()), "Not logged in.");
    }

    #[test]
    fn test_status_far_future_login_does_not_panic() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set("authSession", r#"{"username":"admin","loginTime":"+262142-12-31T23:59:59Z","token":"abc"}"#)
            .unwrap();
        let portal = Portal::new(
            Arc::new(StaticListVerifier::default()),
            SessionStore::new(storage),
            Arc::new(TerminalNavigator),
            "login.html",
        );

        assert!(status_line(&portal, Utc::now()).starts_with("Logged in as admin"));
    }
}
