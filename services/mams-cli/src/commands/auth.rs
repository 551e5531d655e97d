//! Login, logout, and identity commands

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{bail, Context};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use mams_auth_core::{visible_routes, SessionState};
use serde::Serialize;

use crate::context::App;
use crate::output;

pub async fn login(app: &App, username: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };
    if password.is_empty() {
        bail!("password is required");
    }

    // Start from whatever is stored so a rejected login leaves it in place
    app.session.bootstrap().await;

    let identity = app
        .session
        .login(username, &password)
        .await
        .context("login failed")?;

    println!(
        "Logged in as {} ({}{})",
        identity.subject(),
        identity.role(),
        identity
            .base_scope()
            .map(|base| format!(", base {base}"))
            .unwrap_or_default()
    );
    Ok(())
}

pub async fn logout(app: &App) -> anyhow::Result<()> {
    app.session
        .logout()
        .await
        .context("failed to clear stored credentials")?;
    println!("Logged out");
    Ok(())
}

pub async fn refresh(app: &App) -> anyhow::Result<()> {
    let identity = app
        .session
        .refresh()
        .await
        .context("token refresh failed")?;
    println!(
        "Session renewed until {}",
        identity.expires_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}

#[derive(Serialize)]
struct Whoami<'a> {
    username: &'a str,
    role: &'a str,
    base: Option<String>,
    expires_at: String,
    screens: Vec<&'static str>,
}

pub async fn whoami(app: &App) -> anyhow::Result<()> {
    let SessionState::Authenticated(identity) = app.session.bootstrap().await else {
        bail!("not logged in; run `mams login`");
    };

    let screens = visible_routes(Some(&identity))
        .into_iter()
        .map(|route| route.title())
        .collect();
    let report = Whoami {
        username: identity.subject(),
        role: identity.role().code(),
        base: identity.base_scope().map(ToString::to_string),
        expires_at: identity.expires_at().to_rfc3339(),
        screens,
    };

    if app.json {
        return output::print_json(&report);
    }
    println!("User     {}", report.username);
    println!("Role     {}", identity.role());
    println!("Base     {}", report.base.as_deref().unwrap_or("all bases"));
    println!("Expires  {}", report.expires_at);
    println!("Screens  {}", report.screens.join(", "));
    Ok(())
}

/// Read the password from stdin, without echo when stdin is a terminal.
fn prompt_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush().ok();

    if std::io::stdin().is_terminal() {
        return read_hidden();
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_hidden() -> anyhow::Result<String> {
    terminal::enable_raw_mode().context("failed to disable terminal echo")?;
    let entered = read_keys();
    let restored = terminal::disable_raw_mode();
    eprintln!();
    restored.context("failed to restore terminal")?;
    entered
}

fn read_keys() -> anyhow::Result<String> {
    let mut password = String::new();
    loop {
        let Event::Key(key) = event::read().context("failed to read password")? else {
            continue;
        };
        match apply_key(&mut password, key) {
            Entry::Pending => {}
            Entry::Done => return Ok(password),
            Entry::Cancelled => bail!("password entry cancelled"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Pending,
    Done,
    Cancelled,
}

fn apply_key(password: &mut String, key: KeyEvent) -> Entry {
    if key.kind == KeyEventKind::Release {
        return Entry::Pending;
    }
    match key.code {
        KeyCode::Enter => Entry::Done,
        KeyCode::Esc => Entry::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Entry::Cancelled,
        KeyCode::Char(c) => {
            password.push(c);
            Entry::Pending
        }
        KeyCode::Backspace => {
            password.pop();
            Entry::Pending
        }
        _ => Entry::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(password: &mut String, code: KeyCode) -> Entry {
        apply_key(password, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_hidden_entry_collects_until_enter() {
        let mut password = String::new();
        for c in "s3cret".chars() {
            assert_eq!(press(&mut password, KeyCode::Char(c)), Entry::Pending);
        }
        press(&mut password, KeyCode::Backspace);
        press(&mut password, KeyCode::Char('T'));

        assert_eq!(press(&mut password, KeyCode::Enter), Entry::Done);
        assert_eq!(password, "s3creT");
    }

    #[test]
    fn test_hidden_entry_ctrl_c_cancels() {
        let mut password = String::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(apply_key(&mut password, ctrl_c), Entry::Cancelled);
        assert!(password.is_empty());
    }
}
