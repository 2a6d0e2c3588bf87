//! Folder command handlers

use anyhow::{Context, Result};

use stash_core::{Folder, Store};

use super::resolve_id;
use crate::editor::confirm;
use crate::output::Output;

/// Resolve an optional folder reference against the user's folders
pub fn resolve_folder(folders: &[Folder], id: Option<&str>) -> Result<Option<String>> {
    id.map(|id| resolve_id(folders, id, "folder")).transpose()
}

/// Create a folder
pub fn create(store: &Store, name: String, parent: Option<String>, output: &Output) -> Result<()> {
    let library = store.library();
    let parent_id = resolve_folder(&library.folders().get_all(), parent.as_deref())?;

    let folder = library
        .create_folder(&name, parent_id)
        .context("Failed to create folder")?;

    output.success(&format!("Created folder: {}", folder.name));
    output.print_folder(&folder);
    Ok(())
}

/// Show the folder hierarchy
pub fn tree(store: &Store, output: &Output) -> Result<()> {
    let library = store.library();
    output.print_folder_tree(&library.folder_tree(), &library.documents().get_all());
    Ok(())
}

/// Rename a folder
pub fn rename(store: &Store, id: String, name: String, output: &Output) -> Result<()> {
    let library = store.library();
    let id = resolve_id(&library.folders().get_all(), &id, "folder")?;

    let folder = library
        .rename_folder(&id, &name)
        .context("Failed to rename folder")?
        .ok_or_else(|| anyhow::anyhow!("Folder not found: {}", id))?;

    output.success(&format!("Renamed folder to {}", folder.name));
    Ok(())
}

/// Move a folder under another one, or to the root
pub fn move_to(store: &Store, id: String, parent: Option<String>, output: &Output) -> Result<()> {
    let library = store.library();
    let folders = library.folders().get_all();
    let id = resolve_id(&folders, &id, "folder")?;
    let parent_id = resolve_folder(&folders, parent.as_deref())?;

    let folder = library
        .move_folder(&id, parent_id)?
        .ok_or_else(|| anyhow::anyhow!("Folder not found: {}", id))?;

    match folder.parent_id {
        Some(ref parent) => output.success(&format!("Moved {} under {}", folder.name, parent)),
        None => output.success(&format!("Moved {} to the root", folder.name)),
    }
    Ok(())
}

/// Delete a folder and its direct subfolders
pub fn delete(store: &Store, id: String, output: &Output) -> Result<()> {
    let library = store.library();
    let folders = library.folders().get_all();
    let id = resolve_id(&folders, &id, "folder")?;

    if output.should_prompt() {
        let children = folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == Some(id.as_str()))
            .count();
        let documents = library.documents_in(Some(&id)).len();
        println!(
            "Delete folder {} with {} subfolder(s); {} document(s) move to the root",
            id, children, documents
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if library.delete_folder(&id).context("Failed to delete folder")? {
        output.success(&format!("Deleted folder: {}", id));
    } else {
        output.message(&format!("Folder already gone: {}", id));
    }
    Ok(())
}
