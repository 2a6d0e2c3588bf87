//! Statistics and data maintenance handlers

use anyhow::{bail, Context, Result};

use stash_core::Store;

use crate::editor::confirm;
use crate::output::Output;

/// Show the dashboard summary for the signed-in user
pub fn show(store: &Store, output: &Output) -> Result<()> {
    if store.current_user().is_none() && !output.is_json() {
        output.message("Not logged in; showing guest data.");
    }
    output.print_stats(&store.stats());
    if !output.is_json() {
        output.message(&format!(
            "Database: {}",
            store.config().database_path().display()
        ));
    }
    Ok(())
}

/// Remove every record of the signed-in user
pub fn clear(store: &Store, yes: bool, output: &Output) -> Result<()> {
    let Some(user) = store.current_user() else {
        bail!("Not logged in. Run `stash user login <username>` first.");
    };

    if !yes {
        if !output.should_prompt() {
            bail!("Refusing to clear data without --yes");
        }
        println!(
            "This deletes all todos, notes, documents, folders and websites of {}.",
            user.username
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .clear_user_data()
        .context("Failed to clear user data")?;

    output.success(&format!("Cleared all data of {}", user.username));
    Ok(())
}
