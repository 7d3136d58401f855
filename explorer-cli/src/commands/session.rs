use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use rpassword::prompt_password;
use serde_json::{Map, Value};
use shared::models::{Credentials, UserRecord};

use super::AppContext;

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

fn read_credentials(email: Option<String>, password_stdin: bool) -> Result<Credentials> {
    let email = match email {
        Some(email) if !email.trim().is_empty() => email.trim().to_string(),
        _ => prompt("Email: ")?,
    };

    let password = if password_stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read password from stdin")?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        prompt_password("Password: ")?
    };
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    Ok(Credentials::new(email, password))
}

pub async fn login(context: &AppContext, email: Option<String>, password_stdin: bool) -> Result<()> {
    let credentials = read_credentials(email, password_stdin)?;
    let session = context
        .gateway
        .login(&credentials)
        .await
        .with_context(|| format!("login failed for {}", credentials.email))?;

    let store = context.session();
    store.login(session).context("failed to store session")?;
    if store.user().is_some_and(|user| user.email().is_none()) {
        let mut patch = Map::new();
        patch.insert("email".to_string(), Value::String(credentials.email.clone()));
        store.set_user(UserRecord(patch))?;
    }

    println!("Logged in as {}", credentials.email);
    if let Some(role) = store.role() {
        println!("role: {role}");
    }
    println!("session stored at {}", context.session_path().display());
    Ok(())
}

pub async fn register(
    context: &AppContext,
    email: Option<String>,
    password_stdin: bool,
) -> Result<()> {
    let credentials = read_credentials(email, password_stdin)?;
    context
        .gateway
        .register(&credentials)
        .await
        .with_context(|| format!("registration failed for {}", credentials.email))?;

    println!(
        "Registered {}; run `explorer login` to sign in",
        credentials.email
    );
    Ok(())
}

pub fn logout(context: &AppContext) -> Result<()> {
    let store = context.session();
    let had_session = store.current().is_some();
    store.logout().with_context(|| {
        format!(
            "failed to remove session {}",
            context.session_path().display()
        )
    })?;

    if had_session {
        println!("Removed session at {}", context.session_path().display());
    } else {
        println!("No session found at {}", context.session_path().display());
    }
    Ok(())
}

pub fn whoami(context: &AppContext) -> Result<()> {
    context.require_session()?;
    let store = context.session();
    let user = store.user().unwrap_or_default();

    println!(
        "Logged in as {}",
        user.email().unwrap_or("an account without email")
    );
    if let Some(role) = store.role() {
        println!("role: {role}");
    }
    println!("session stored at {}", context.session_path().display());
    Ok(())
}
