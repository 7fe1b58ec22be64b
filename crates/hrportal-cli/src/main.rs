//! hrportal - command-line front end for the HR portal login flow.
//!
//! Drives the same session store the portal uses: request a one-time code,
//! verify it, inspect the session, check where a path would navigate, and
//! log out. State persists between invocations through the configured
//! storage backend.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hrportal_core::auth::{AuthError, AuthState, IdentityProvider, SessionStore};
use hrportal_core::routes::{nav_links, page_title, resolve, Navigation};
use hrportal_core::storage::DurableStorage;
use hrportal_core::validation::{validate_code, validate_email};
use hrportal_core::Config;

// ============================================================================
// Constants
// ============================================================================

/// Log file name in the state directory
const LOG_FILE: &str = "hrportal.log";

const USAGE: &str = "\
Usage: hrportal <command>

Commands:
  login [email]   Request a one-time code and verify it
  verify <code>   Verify a code for the pending login
  logout          End the current session
  status          Show the current session
  open <path>     Show where navigating to <path> would lead
  nav             List the menu for the current role";

/// Initialize the tracing subscriber for logging.
///
/// Stderr gets warnings (override with RUST_LOG); the log file in the state
/// directory gets everything at info and above.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_filter(filter);

    let (file_layer, guard) = match config.state_dir() {
        Ok(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("info"));
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut config = Config::load()?;
    let _log_guard = init_tracing(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        println!("{}", USAGE);
        return Ok(());
    };

    let storage = config.open_storage()?;
    let mut store = SessionStore::with_options(
        config.identity_provider(),
        storage,
        config.session_options(),
    );
    store.initialize().context("Failed to restore session")?;
    if let Some(ref message) = store.session().last_error {
        println!("{}", message);
    }

    match (command, args.get(1).map(String::as_str)) {
        ("login", email) => login(&mut store, &mut config, email).await?,
        ("verify", Some(code)) => verify(&mut store, code).await?,
        ("logout", None) => {
            store.logout()?;
            println!("You have been logged out");
        }
        ("status", None) => status(&store)?,
        ("open", Some(path)) => open(&store, path),
        ("nav", None) => nav(&store),
        _ => {
            println!("{}", USAGE);
        }
    }

    drop(store.shutdown());
    Ok(())
}

async fn login<P, S>(
    store: &mut SessionStore<P, S>,
    config: &mut Config,
    email: Option<&str>,
) -> Result<()>
where
    P: IdentityProvider,
    S: DurableStorage,
{
    let email = match email {
        Some(email) => email.to_string(),
        None => prompt_email(config.last_email.as_deref())?,
    };
    if let Err(e) = validate_email(&email) {
        println!("{}", e);
        return Ok(());
    }

    let delivery = match store.request_code(&email).await {
        Ok(delivery) => delivery,
        Err(e) if e.is_recoverable() => {
            println!("{}", e.user_message());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    config.last_email = Some(delivery.email.clone());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("We've sent a 6-digit code to {}", delivery.email);
    if let Some(hint) = delivery.hint {
        println!("(development provider - use code {})", hint);
    }

    loop {
        let code = rpassword::prompt_password("Code (empty to cancel): ")?;
        let code = code.trim();
        if code.is_empty() {
            println!("Login cancelled; the code request stays pending.");
            return Ok(());
        }
        if let Err(e) = validate_code(code) {
            println!("{}", e);
            continue;
        }

        match store.verify_code(code).await {
            Ok(home) => {
                println!("Login successful. Home: {}", home.path());
                return Ok(());
            }
            Err(AuthError::InvalidCode) => {
                println!("{}", AuthError::InvalidCode.user_message());
            }
            Err(e) if e.is_recoverable() => {
                println!("{}", e.user_message());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn verify<P, S>(store: &mut SessionStore<P, S>, code: &str) -> Result<()>
where
    P: IdentityProvider,
    S: DurableStorage,
{
    if let Err(e) = validate_code(code) {
        println!("{}", e);
        return Ok(());
    }
    match store.verify_code(code).await {
        Ok(home) => println!("Login successful. Home: {}", home.path()),
        Err(e) if e.is_recoverable() => println!("{}", e.user_message()),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn status<P, S>(store: &SessionStore<P, S>) -> Result<()>
where
    P: IdentityProvider,
    S: DurableStorage,
{
    match store.state() {
        AuthState::Anonymous => println!("Not logged in"),
        AuthState::CodeRequested => {
            let email = store.pending_email()?.unwrap_or_default();
            println!("Waiting for the code sent to {}", email);
        }
        AuthState::Authenticated => {
            if let Some(ref identity) = store.session().identity {
                println!("Logged in as {} <{}>", identity.name, identity.email);
                println!("Role: {}", identity.role.display_name());
                println!(
                    "Session expires at {} ({} min left)",
                    identity.expires_at.format("%Y-%m-%d %H:%M UTC"),
                    identity.minutes_until_expiry()
                );
            }
        }
    }
    Ok(())
}

fn open<P, S>(store: &SessionStore<P, S>, path: &str)
where
    P: IdentityProvider,
    S: DurableStorage,
{
    match resolve(path, store.session()) {
        Navigation::Loading => println!("Loading..."),
        Navigation::Render(route) => {
            let title = match store.session().role() {
                Some(role) if route.required_role() == Some(role) => page_title(role, &route.path()),
                _ => route.title(),
            };
            println!("Render {} ({})", route.path(), title);
            if route.is_auth_page() {
                if let Some(email) = store.session().email() {
                    println!("Already logged in as {}", email);
                }
            }
        }
        Navigation::Redirect(route) => {
            info!(from = path, to = %route.path(), "Redirected");
            println!("Redirect to {}", route.path());
        }
    }
}

fn nav<P, S>(store: &SessionStore<P, S>)
where
    P: IdentityProvider,
    S: DurableStorage,
{
    let Some(role) = store.session().role() else {
        println!("Not logged in");
        return;
    };
    for link in nav_links(role) {
        println!("{:<24} {}", link.label, link.path);
    }
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    match last_email {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last_email) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}
