//! Auth command handlers.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use fieldledger_core::api::ApiClient;
use fieldledger_core::auth::AuthPhase;
use fieldledger_core::config::Config;
use fieldledger_core::session::{FileSessionStore, Session, mask_token};

pub async fn login(config: &Config, email: Option<&str>, password: Option<&str>) -> Result<()> {
    let mut auth = super::auth_manager();

    // Check if already logged in
    if auth.restore() == AuthPhase::Authenticated {
        let uid = auth.session().map(|s| s.uid.clone()).unwrap_or_default();
        println!("Already logged in as {uid}.");
        print!("Do you want to replace the existing session? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Login cancelled.");
            return Ok(());
        }
    }

    let email = match email {
        Some(value) => value.to_string(),
        None => prompt_line("E-mail: ")?,
    };
    let password = match password {
        Some(value) => value.to_string(),
        None => prompt_line("Password: ")?,
    };

    let client = ApiClient::new(config.resolve_backend_url()?);
    let session = auth.login(&client, &email, &password).await?;

    let session_path = FileSessionStore::open_default();
    println!(
        "✓ Logged in as {} <{}> (token: {})",
        session.user.name,
        session.user.email,
        mask_token(&session.access_token)
    );
    println!("  Session saved to: {}", session_path.path().display());

    Ok(())
}

pub fn logout() -> Result<()> {
    let mut auth = super::auth_manager();
    let had_session = auth.restore() == AuthPhase::Authenticated;
    auth.logout();

    if had_session {
        let session_path = FileSessionStore::open_default();
        println!("✓ Logged out");
        println!("  Session removed from: {}", session_path.path().display());
    } else {
        println!("Not logged in (no stored session).");
    }

    Ok(())
}

pub async fn whoami(config: &Config, verify: bool) -> Result<()> {
    let mut auth = super::auth_manager();
    if auth.restore() != AuthPhase::Authenticated {
        println!("Not logged in (no stored session).");
        return Ok(());
    }

    if verify {
        let client = ApiClient::new(config.resolve_backend_url()?);
        let session = auth.verify(&client).await?;
        println!("✓ Token is valid");
        print_session(&session);
    } else if let Some(session) = auth.session() {
        print_session(session);
    }

    Ok(())
}

fn print_session(session: &Session) {
    println!("{} <{}>", session.user.name, session.user.email);
    println!("  uid:   {}", session.uid);
    println!("  token: {}", mask_token(&session.access_token));
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let value = input.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("Input cannot be empty");
    }
    Ok(value)
}
