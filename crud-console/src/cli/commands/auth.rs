//! Login and logout

use anyhow::{Context, Result, bail};
use colored::*;
use std::io::{self, BufRead, Write};

use crate::cli::AppContext;

pub async fn login(ctx: &AppContext, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    if username.is_empty() {
        bail!("Username cannot be empty");
    }

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    ctx.client
        .login(&username, &password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .context("Login failed")?;

    println!("Logged in as {}", username.bright_green().bold());
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.client.logout().await.context("Failed to clear session")?;
    println!("{}", "Logged out".bright_green());
    Ok(())
}

/// Read one trimmed line from stdin after printing `label`
pub fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}
