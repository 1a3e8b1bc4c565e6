mod records;
mod tasks;

use std::io::{self, BufRead, IsTerminal, Write};

use serde::Serialize;

use crate::api::client::{ApiClient, AuthedClient};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::logging;
use crate::io::session::SessionStore;
use crate::model::session::{Credentials, Session};
use crate::model::user::{PasswordChange, ProfileUpdate, UserDirectory};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Shared state for one CLI invocation
pub struct Ctx {
    pub api: ApiClient,
    pub store: SessionStore,
    pub json: bool,
}

impl Ctx {
    /// The stored session, or "not logged in"
    pub fn session(&self) -> Result<Session, Box<dyn std::error::Error>> {
        Ok(self.store.require()?)
    }

    pub fn authed(&self) -> Result<AuthedClient, Box<dyn std::error::Error>> {
        Ok(self.api.authed(self.session()?))
    }

    /// Users for name lookups. A failure here only costs display names.
    pub async fn directory(&self, session: &Session) -> UserDirectory {
        match self.api.fetch_users(session).await {
            Ok(users) => UserDirectory::new(users),
            Err(e) => {
                tracing::warn!(error = %e, "could not load users");
                UserDirectory::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub async fn dispatch(cli: Cli) -> CmdResult {
    let config = config_io::read_config()?;
    logging::init_cli(config.log.level.as_deref());
    let base_url = config_io::base_url_from_env(cli.api_url.as_deref(), &config);
    tracing::debug!(%base_url, "cli start");
    let ctx = Ctx {
        api: ApiClient::new(base_url)?,
        store: SessionStore::default_location(),
        json: cli.json,
    };

    let Some(cmd) = cli.command else {
        return Err("no command given (run `tb` without arguments for the TUI)".into());
    };
    match cmd {
        // Session
        Commands::Login(args) => cmd_login(&ctx, args).await,
        Commands::Logout => cmd_logout(&ctx),
        Commands::Whoami => cmd_whoami(&ctx).await,

        // Task views
        Commands::List(args) => tasks::cmd_list(&ctx, args).await,
        Commands::Board(args) => tasks::cmd_board(&ctx, args).await,
        Commands::Gantt(args) => tasks::cmd_gantt(&ctx, args).await,
        Commands::Show(args) => tasks::cmd_show(&ctx, args).await,

        // Task writes
        Commands::Add(args) => tasks::cmd_add(&ctx, args).await,
        Commands::Edit(args) => tasks::cmd_edit(&ctx, args).await,
        Commands::Mv(args) => tasks::cmd_mv(&ctx, args).await,
        Commands::Rm(args) => tasks::cmd_rm(&ctx, args).await,

        // Lookups and account
        Commands::Projects => cmd_projects(&ctx).await,
        Commands::Users => cmd_users(&ctx).await,
        Commands::Profile(args) => cmd_profile(&ctx, args).await,
        Commands::Passwd => cmd_passwd(&ctx).await,
        Commands::Notifications => cmd_notifications(&ctx).await,
        Commands::Activity => cmd_activity(&ctx).await,

        // Case management
        Commands::Records(args) => records::cmd_records(&ctx, args).await,
        Commands::Company(cmd) => records::cmd_company(&ctx, cmd).await,
        Commands::Case(cmd) => records::cmd_case(&ctx, cmd).await,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a line without echoing it. Falls back to a plain read when stdin
/// is not a terminal.
fn prompt_secret(prompt: &str) -> io::Result<String> {
    use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

    if !io::stdin().is_terminal() {
        return prompt_line(prompt);
    }
    eprint!("{}", prompt);
    io::stderr().flush()?;
    enable_raw_mode()?;
    let mut secret = String::new();
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Enter => break Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    break Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"));
                }
                KeyCode::Char(c) => secret.push(c),
                KeyCode::Backspace => {
                    secret.pop();
                }
                KeyCode::Esc => {
                    break Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"));
                }
                _ => {}
            },
            Ok(_) => {}
            Err(e) => break Err(e),
        }
    };
    disable_raw_mode()?;
    eprintln!();
    result.map(|_| secret)
}

/// Ask a yes/no question on stderr; anything but `y`/`yes` is a no
fn confirm(prompt: &str) -> io::Result<bool> {
    let answer = prompt_line(&format!("{} [y/N] ", prompt))?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

async fn cmd_login(ctx: &Ctx, args: LoginArgs) -> CmdResult {
    let password = match args.password {
        Some(p) => p,
        None => prompt_secret("Password: ")?,
    };
    let credentials = Credentials {
        username: args.username.clone(),
        password,
    };
    let session = ctx.api.login(&credentials).await?;
    ctx.store.save(&session)?;
    if ctx.json {
        print_json(&serde_json::json!({ "username": args.username, "loggedIn": true }))
    } else {
        println!("logged in as {}", args.username);
        Ok(())
    }
}

fn cmd_logout(ctx: &Ctx) -> CmdResult {
    let cleared = ctx.store.clear()?;
    if ctx.json {
        return print_json(&serde_json::json!({ "loggedOut": cleared }));
    }
    if cleared {
        println!("logged out");
    } else {
        println!("not logged in");
    }
    Ok(())
}

async fn cmd_whoami(ctx: &Ctx) -> CmdResult {
    let session = ctx.session()?;
    let me = ctx.api.fetch_me(&session).await?;
    if ctx.json {
        print_json(&me)
    } else {
        println!("{}", format_user(&me));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lookups and account
// ---------------------------------------------------------------------------

async fn cmd_projects(ctx: &Ctx) -> CmdResult {
    let session = ctx.session()?;
    let projects = ctx.api.fetch_projects(&session).await?;
    if ctx.json {
        return print_json(&projects);
    }
    for p in &projects {
        println!("{}", format_project(p));
    }
    Ok(())
}

async fn cmd_users(ctx: &Ctx) -> CmdResult {
    let session = ctx.session()?;
    let users = ctx.api.fetch_users(&session).await?;
    if ctx.json {
        return print_json(&users);
    }
    for u in &users {
        println!("{}", format_user(u));
    }
    Ok(())
}

async fn cmd_profile(ctx: &Ctx, args: ProfileArgs) -> CmdResult {
    let session = ctx.session()?;
    let update = ProfileUpdate {
        bio: args.bio,
        department: args.department,
    };
    let user = if update.is_empty() {
        ctx.api.fetch_profile(&session).await?
    } else {
        ctx.api.update_profile(&session, &update).await?
    };
    if ctx.json {
        print_json(&user)
    } else {
        print_lines(&format_profile(&user));
        Ok(())
    }
}

async fn cmd_passwd(ctx: &Ctx) -> CmdResult {
    let session = ctx.session()?;
    let current_password = prompt_secret("Current password: ")?;
    let new_password = prompt_secret("New password: ")?;
    if new_password.is_empty() {
        return Err("new password must not be empty".into());
    }
    let again = prompt_secret("Repeat new password: ")?;
    if again != new_password {
        return Err("passwords do not match".into());
    }
    let change = PasswordChange {
        current_password,
        new_password,
    };
    ctx.api.change_password(&session, &change).await?;
    println!("password changed");
    Ok(())
}

async fn cmd_notifications(ctx: &Ctx) -> CmdResult {
    let session = ctx.session()?;
    let items = ctx.api.fetch_notifications(&session).await?;
    if ctx.json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("no notifications");
    }
    for n in &items {
        println!("{}", format_notification(n));
    }
    Ok(())
}

async fn cmd_activity(ctx: &Ctx) -> CmdResult {
    let session = ctx.session()?;
    let items = ctx.api.fetch_activity(&session).await?;
    if ctx.json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("no activity");
    }
    for a in &items {
        println!("{}", format_activity(a));
    }
    Ok(())
}
