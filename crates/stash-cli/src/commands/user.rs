//! Account command handlers

use anyhow::{bail, Result};

use stash_core::Store;

use crate::editor::read_password;
use crate::output::Output;

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => read_password("Password"),
    }
}

/// Create an account
pub fn register(
    store: &Store,
    username: String,
    email: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    if username.trim().is_empty() {
        bail!("Username cannot be empty");
    }
    let password = password_or_prompt(password)?;

    let user = store.register(&username, &email, &password)?;

    output.success(&format!("Registered {}", user.username));
    output.message(&format!("Log in with: stash user login {}", user.username));
    Ok(())
}

/// Sign in
pub fn login(
    store: &mut Store,
    username: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = password_or_prompt(password)?;
    let user = store.login(&username, &password)?;

    output.success(&format!("Logged in as {}", user.username));
    Ok(())
}

/// Sign out
pub fn logout(store: &mut Store, output: &Output) -> Result<()> {
    let username = store.current_user().map(|u| u.username.clone());
    store.logout()?;

    match username {
        Some(name) => output.success(&format!("Logged out {}", name)),
        None => output.message("Not logged in."),
    }
    Ok(())
}

/// Show the signed-in user
pub fn whoami(store: &Store, output: &Output) -> Result<()> {
    match store.current_user() {
        Some(user) => output.print_user(user),
        None if output.is_json() => println!("null"),
        None => output.message("Not logged in (guest)."),
    }
    Ok(())
}

/// List registered accounts
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_users(&store.users(), store.current_user());
    Ok(())
}
